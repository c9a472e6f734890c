// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

use super::*;

const SPEAKER_SWITCHING_NAME: &str = "Speaker Switching";
const TALKBACK_SWITCHING_NAME: &str = "Talkback Switching";
const DIRECT_MONITOR_NAME: &str = "Direct Monitor";

const SPEAKER_LABELS: [&str; 3] = ["Off", "Main", "Alt"];
const DIRECT_MONITOR_MONO_LABELS: [&str; 2] = ["Off", "On"];
const DIRECT_MONITOR_STEREO_LABELS: [&str; 3] = ["Off", "Mono", "Stereo"];

fn speaker_switch_to_pos(switch: SpeakerSwitch) -> u32 {
    match switch {
        SpeakerSwitch::Off => 0,
        SpeakerSwitch::Main => 1,
        SpeakerSwitch::Alt => 2,
    }
}

fn speaker_switch_from_pos(pos: u32) -> SpeakerSwitch {
    match pos {
        2 => SpeakerSwitch::Alt,
        1 => SpeakerSwitch::Main,
        _ => SpeakerSwitch::Off,
    }
}

/// Speaker switching, talkback, and direct monitor.
pub struct MonitorCtl<T: Scarlett2HardwareSpecification> {
    pub notified_elem_id_list: Vec<ElemId>,
    pub params: Scarlett2MonitorParameters,
    speaker_elem_id: Option<ElemId>,
    talkback_elem_id: Option<ElemId>,
    direct_monitor_elem_id: Option<ElemId>,
    mix_talkback_elem_ids: Vec<ElemId>,
    flags: Arc<NotificationFlags>,
    _phantom: PhantomData<T>,
}

impl<T: Scarlett2HardwareSpecification> MonitorCtl<T> {
    pub fn new(flags: Arc<NotificationFlags>) -> Self {
        Self {
            notified_elem_id_list: Default::default(),
            params: T::create_monitor_parameters(),
            speaker_elem_id: Default::default(),
            talkback_elem_id: Default::default(),
            direct_monitor_elem_id: Default::default(),
            mix_talkback_elem_ids: Default::default(),
            flags,
            _phantom: Default::default(),
        }
    }

    fn refresh(&mut self, unit: &mut SndScarlett2) -> Result<(), Error> {
        T::cache_monitor_state(unit, &mut self.params, TIMEOUT_MS)?;
        self.flags.clear_speaker();
        Ok(())
    }

    fn refresh_if_stale(&mut self, unit: &mut SndScarlett2) -> Result<(), Error> {
        if self.flags.speaker_stale() {
            self.refresh(unit)
        } else {
            Ok(())
        }
    }

    pub fn cache(&mut self, unit: &mut SndScarlett2) -> Result<(), Error> {
        self.refresh(unit)
    }

    pub fn load(&mut self, card_cntr: &mut CardCntr) -> Result<(), Error> {
        if T::HAS_SPEAKER_SWITCHING {
            let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, SPEAKER_SWITCHING_NAME, 0);
            let mut elem_id_list = card_cntr.add_enum_elems(&elem_id, 1, 1, &SPEAKER_LABELS)?;
            let elem_id = elem_id_list.remove(0);
            self.notified_elem_id_list.push(elem_id.clone());
            self.speaker_elem_id = Some(elem_id);
        }

        if T::HAS_TALKBACK {
            let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, TALKBACK_SWITCHING_NAME, 0);
            let mut elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1)?;
            let elem_id = elem_id_list.remove(0);
            self.notified_elem_id_list.push(elem_id.clone());
            self.talkback_elem_id = Some(elem_id);

            (0..T::mixer_output_count()).try_for_each(|mix| {
                let name = format!("Mix {} Talkback", (b'A' + mix as u8) as char);
                let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, &name, 0);
                let mut elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1)?;
                self.mix_talkback_elem_ids.push(elem_id_list.remove(0));
                Ok::<(), Error>(())
            })?;
        }

        if let Some(variant) = T::DIRECT_MONITOR {
            let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, DIRECT_MONITOR_NAME, 0);
            let labels: &[&str] = match variant {
                DirectMonitorVariant::Mono => &DIRECT_MONITOR_MONO_LABELS,
                DirectMonitorVariant::Stereo => &DIRECT_MONITOR_STEREO_LABELS,
            };
            let mut elem_id_list = card_cntr.add_enum_elems(&elem_id, 1, 1, labels)?;
            let elem_id = elem_id_list.remove(0);
            self.notified_elem_id_list.push(elem_id.clone());
            self.direct_monitor_elem_id = Some(elem_id);
        }

        Ok(())
    }

    pub fn read(
        &mut self,
        unit: &mut SndScarlett2,
        elem_id: &ElemId,
        elem_value: &mut ElemValue,
    ) -> Result<bool, Error> {
        if self
            .speaker_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            self.refresh_if_stale(unit)?;
            elem_value.set_enum(&[speaker_switch_to_pos(self.params.speaker_switch)]);
            Ok(true)
        } else if self
            .talkback_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            self.refresh_if_stale(unit)?;
            elem_value.set_bool(&[self.params.talkback_switch]);
            Ok(true)
        } else if self
            .direct_monitor_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            self.refresh_if_stale(unit)?;
            elem_value.set_enum(&[self.params.direct_monitor]);
            Ok(true)
        } else if let Some(mix) = self
            .mix_talkback_elem_ids
            .iter()
            .position(|id| id.eq(elem_id))
        {
            elem_value.set_bool(&[self.params.mix_talkbacks[mix]]);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn write(
        &mut self,
        unit: &mut SndScarlett2,
        save: &SaveHandle,
        elem_id: &ElemId,
        elem_value: &ElemValue,
    ) -> Result<bool, Error> {
        if self
            .speaker_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            self.refresh_if_stale(unit)?;

            let speaker = speaker_switch_from_pos(elem_value.enumerated()[0]);
            save.cancel();
            let talkback = self.params.talkback_switch;
            T::update_speaker_state(unit, &mut self.params, speaker, talkback, TIMEOUT_MS)?;
            save.arm();
            Ok(true)
        } else if self
            .talkback_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            self.refresh_if_stale(unit)?;

            let talkback = elem_value.boolean()[0];
            save.cancel();
            let speaker = self.params.speaker_switch;
            T::update_speaker_state(unit, &mut self.params, speaker, talkback, TIMEOUT_MS)?;
            save.arm();
            Ok(true)
        } else if self
            .direct_monitor_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            self.refresh_if_stale(unit)?;

            let state = match T::DIRECT_MONITOR {
                Some(DirectMonitorVariant::Stereo) => elem_value.enumerated()[0].min(2),
                _ => (elem_value.enumerated()[0] > 0) as u32,
            };
            if self.params.direct_monitor == state {
                return Ok(true);
            }

            save.cancel();
            self.params.direct_monitor = state;
            T::write_config(
                unit,
                ConfigParameter::DirectMonitorSwitch,
                0,
                state as i32,
                TIMEOUT_MS,
            )?;
            save.arm();
            Ok(true)
        } else if let Some(mix) = self
            .mix_talkback_elem_ids
            .iter()
            .position(|id| id.eq(elem_id))
        {
            let state = elem_value.boolean()[0];
            if self.params.mix_talkbacks[mix] == state {
                return Ok(true);
            }

            save.cancel();
            self.params.mix_talkbacks[mix] = state;
            let value = T::mix_talkback_write_value(&self.params);
            T::write_config(unit, ConfigParameter::MixTalkback, 0, value, TIMEOUT_MS)?;
            save.arm();
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
