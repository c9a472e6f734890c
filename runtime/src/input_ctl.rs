// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

use super::*;

const RETAIN_48V_NAME: &str = "Analogue In 48V Retain";

const LEVEL_LABELS: [&str; 2] = ["Line", "Inst"];

/// Line/Inst level, pad, air, and phantom powering of analogue inputs.
pub struct InputCtl<T: Scarlett2HardwareSpecification> {
    pub notified_elem_id_list: Vec<ElemId>,
    pub params: Scarlett2InputSwitchParameters,
    level_elem_ids: Vec<ElemId>,
    pad_elem_ids: Vec<ElemId>,
    air_elem_ids: Vec<ElemId>,
    phantom_elem_ids: Vec<ElemId>,
    retain_elem_id: Option<ElemId>,
    flags: Arc<NotificationFlags>,
    _phantom: PhantomData<T>,
}

impl<T: Scarlett2HardwareSpecification> InputCtl<T> {
    pub fn new(flags: Arc<NotificationFlags>) -> Self {
        Self {
            notified_elem_id_list: Default::default(),
            params: T::create_input_switch_parameters(),
            level_elem_ids: Default::default(),
            pad_elem_ids: Default::default(),
            air_elem_ids: Default::default(),
            phantom_elem_ids: Default::default(),
            retain_elem_id: Default::default(),
            flags,
            _phantom: Default::default(),
        }
    }

    fn refresh(&mut self, unit: &mut SndScarlett2) -> Result<(), Error> {
        T::cache_input_switches(unit, &mut self.params, TIMEOUT_MS)?;
        self.flags.clear_line_ctl();
        Ok(())
    }

    fn refresh_if_stale(&mut self, unit: &mut SndScarlett2) -> Result<(), Error> {
        if self.flags.line_ctl_stale() {
            self.refresh(unit)
        } else {
            Ok(())
        }
    }

    pub fn cache(&mut self, unit: &mut SndScarlett2) -> Result<(), Error> {
        self.refresh(unit)
    }

    pub fn load(&mut self, card_cntr: &mut CardCntr) -> Result<(), Error> {
        (0..T::LEVEL_INPUT_COUNT).try_for_each(|i| {
            let name = format!("Line In {} Mode Switch", i + 1 + T::LEVEL_INPUT_OFFSET);
            let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, &name, 0);
            let mut elem_id_list = card_cntr.add_enum_elems(&elem_id, 1, 1, &LEVEL_LABELS)?;
            let elem_id = elem_id_list.remove(0);
            self.notified_elem_id_list.push(elem_id.clone());
            self.level_elem_ids.push(elem_id);
            Ok::<(), Error>(())
        })?;

        (0..T::PAD_INPUT_COUNT).try_for_each(|i| {
            let name = format!("Line In {} Pad Switch", i + 1);
            let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, &name, 0);
            let mut elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1)?;
            let elem_id = elem_id_list.remove(0);
            self.notified_elem_id_list.push(elem_id.clone());
            self.pad_elem_ids.push(elem_id);
            Ok::<(), Error>(())
        })?;

        (0..T::AIR_INPUT_COUNT).try_for_each(|i| {
            let name = format!("Line In {} Air Switch", i + 1);
            let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, &name, 0);
            let mut elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1)?;
            let elem_id = elem_id_list.remove(0);
            self.notified_elem_id_list.push(elem_id.clone());
            self.air_elem_ids.push(elem_id);
            Ok::<(), Error>(())
        })?;

        (0..T::PHANTOM_SWITCH_COUNT).try_for_each(|i| {
            let name = if T::PHANTOM_SWITCH_COUNT > 1 {
                format!("Line 48V Switch {}", i + 1)
            } else {
                "Line 48V Switch".to_string()
            };
            let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, &name, 0);
            let mut elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1)?;
            let elem_id = elem_id_list.remove(0);
            self.notified_elem_id_list.push(elem_id.clone());
            self.phantom_elem_ids.push(elem_id);
            Ok::<(), Error>(())
        })?;

        if T::HAS_RETAIN_48V {
            let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, RETAIN_48V_NAME, 0);
            let mut elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1)?;
            let elem_id = elem_id_list.remove(0);
            self.notified_elem_id_list.push(elem_id.clone());
            self.retain_elem_id = Some(elem_id);
        }

        Ok(())
    }

    pub fn read(
        &mut self,
        unit: &mut SndScarlett2,
        elem_id: &ElemId,
        elem_value: &mut ElemValue,
    ) -> Result<bool, Error> {
        if let Some(i) = self.level_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit)?;
            elem_value.set_enum(&[self.params.level_switches[i] as u32]);
            Ok(true)
        } else if let Some(i) = self.pad_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit)?;
            elem_value.set_bool(&[self.params.pad_switches[i]]);
            Ok(true)
        } else if let Some(i) = self.air_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit)?;
            elem_value.set_bool(&[self.params.air_switches[i]]);
            Ok(true)
        } else if let Some(i) = self.phantom_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit)?;
            elem_value.set_bool(&[self.params.phantom_switches[i]]);
            Ok(true)
        } else if self
            .retain_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            self.refresh_if_stale(unit)?;
            elem_value.set_bool(&[self.params.retain_48v]);
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
        if let Some(i) = self.level_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit)?;

            let state = elem_value.enumerated()[0] > 0;
            if self.params.level_switches[i] == state {
                return Ok(true);
            }

            save.cancel();
            self.params.level_switches[i] = state;
            let (index, value) = T::level_switch_write_value(&self.params, i);
            T::write_config(unit, ConfigParameter::LevelSwitch, index, value, TIMEOUT_MS)?;
            save.arm();
            Ok(true)
        } else if let Some(i) = self.pad_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit)?;

            let state = elem_value.boolean()[0];
            if self.params.pad_switches[i] == state {
                return Ok(true);
            }

            save.cancel();
            self.params.pad_switches[i] = state;
            T::write_config(unit, ConfigParameter::PadSwitch, i, state as i32, TIMEOUT_MS)?;
            save.arm();
            Ok(true)
        } else if let Some(i) = self.air_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit)?;

            let state = elem_value.boolean()[0];
            if self.params.air_switches[i] == state {
                return Ok(true);
            }

            save.cancel();
            self.params.air_switches[i] = state;
            let (index, value) = T::air_switch_write_value(&self.params, i);
            T::write_config(unit, ConfigParameter::AirSwitch, index, value, TIMEOUT_MS)?;
            save.arm();
            Ok(true)
        } else if let Some(i) = self.phantom_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit)?;

            let state = elem_value.boolean()[0];
            if self.params.phantom_switches[i] == state {
                return Ok(true);
            }

            save.cancel();
            self.params.phantom_switches[i] = state;
            let value = T::phantom_switch_write_value(&self.params);
            T::write_config(unit, ConfigParameter::PhantomPowerSwitch, 0, value, TIMEOUT_MS)?;
            save.arm();
            Ok(true)
        } else if self
            .retain_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            self.refresh_if_stale(unit)?;

            let state = elem_value.boolean()[0];
            if self.params.retain_48v == state {
                return Ok(true);
            }

            save.cancel();
            self.params.retain_48v = state;
            T::write_config(
                unit,
                ConfigParameter::Retain48vSwitch,
                0,
                state as i32,
                TIMEOUT_MS,
            )?;
            save.arm();
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
