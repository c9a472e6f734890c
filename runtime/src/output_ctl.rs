// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

use super::*;

const MASTER_VOL_NAME: &str = "Master HW Playback Volume";
const BUTTON_NAMES: [&str; 2] = ["Mute Playback Switch", "Dim Playback Switch"];

fn line_out_label<T: Scarlett2HardwareSpecification>(index: usize) -> String {
    T::PORT_NAMES
        .iter()
        .find(|entry| {
            entry.direction == PortDirection::Output
                && entry.port_type == PortType::Analogue
                && entry.index == index
        })
        .map(|entry| entry.name.to_string())
        .unwrap_or_else(|| {
            let flat = port_flat_index(T::PORTS, PortDirection::Output, PortType::Analogue, index);
            T::port_name(PortDirection::Output, flat)
        })
}

/// Volumes, mutes, SW/HW switches, and the hardware buttons of outputs.
pub struct OutputCtl<T: Scarlett2HardwareSpecification> {
    pub notified_elem_id_list: Vec<ElemId>,
    pub params: Scarlett2OutputParameters,
    master_elem_id: Option<ElemId>,
    vol_elem_ids: Vec<ElemId>,
    sw_hw_elem_ids: Vec<ElemId>,
    mute_elem_ids: Vec<ElemId>,
    button_elem_ids: Vec<ElemId>,
    pending_access_changes: Vec<(ElemId, bool)>,
    pending_value_changes: Vec<ElemId>,
    /// Raised when a mute landed in the software configuration and the mux must be rewritten.
    pub(crate) mux_resync_required: bool,
    flags: Arc<NotificationFlags>,
    _phantom: PhantomData<T>,
}

impl<T: Scarlett2HardwareSpecification> OutputCtl<T> {
    const VOL_TLV: DbInterval = DbInterval {
        min: -(VOLUME_BIAS * 100),
        max: 0,
        linear: false,
        mute_avail: false,
    };

    pub fn new(flags: Arc<NotificationFlags>) -> Self {
        Self {
            notified_elem_id_list: Default::default(),
            params: T::create_output_parameters(),
            master_elem_id: Default::default(),
            vol_elem_ids: Default::default(),
            sw_hw_elem_ids: Default::default(),
            mute_elem_ids: Default::default(),
            button_elem_ids: Default::default(),
            pending_access_changes: Default::default(),
            pending_value_changes: Default::default(),
            mux_resync_required: false,
            flags,
            _phantom: Default::default(),
        }
    }

    fn refresh(
        &mut self,
        unit: &mut SndScarlett2,
        sw_cfg: Option<&Scarlett2SoftwareConfig>,
    ) -> Result<(), Error> {
        if !T::HAS_HW_VOLUME {
            self.flags.clear_vol();
            return Ok(());
        }

        let mut status = Scarlett2VolumeStatus::default();
        T::cache_volume_status(unit, &mut status, TIMEOUT_MS)?;
        T::parse_volume_status(&mut self.params, &status);

        // A software controlled output prefers the volume of the configuration area.
        if let Some(cfg) = sw_cfg {
            (0..T::analogue_output_count()).for_each(|i| {
                if !self.params.vol_sw_hw_switches[i] {
                    self.params.vols[i] =
                        (cfg.volume(i) as i32 + VOLUME_BIAS).clamp(VOLUME_MIN, VOLUME_MAX);
                }
            });
        }

        // The flag clears only after the image arrived; a failed read leaves it raised.
        self.flags.clear_vol();
        Ok(())
    }

    fn refresh_if_stale(
        &mut self,
        unit: &mut SndScarlett2,
        sw_cfg: Option<&Scarlett2SoftwareConfig>,
    ) -> Result<(), Error> {
        if self.flags.vol_stale() {
            self.refresh(unit, sw_cfg)
        } else {
            Ok(())
        }
    }

    pub fn cache(
        &mut self,
        unit: &mut SndScarlett2,
        sw_cfg: Option<&Scarlett2SoftwareConfig>,
    ) -> Result<(), Error> {
        self.refresh(unit, sw_cfg)?;

        // Mutes of the remaining outputs live in the configuration area.
        if let Some(cfg) = sw_cfg {
            if T::HAS_MUX {
                let mask = cfg.mute_mask();
                (T::analogue_output_count()..T::mute_switch_count())
                    .for_each(|i| self.params.mutes[i] = mask & (1 << i) > 0);
            }
        }

        // Software volumes are re-committed so that the unit and the area agree.
        if sw_cfg.is_some() {
            (0..T::analogue_output_count()).try_for_each(|i| {
                T::write_config(
                    unit,
                    ConfigParameter::LineOutVolume,
                    i,
                    self.params.vols[i] - VOLUME_BIAS,
                    TIMEOUT_MS,
                )
            })?;
        }

        Ok(())
    }

    pub fn load(
        &mut self,
        card_cntr: &mut CardCntr,
        sw_cfg_present: bool,
    ) -> Result<(), Error> {
        if T::LINE_OUT_HW_VOL {
            let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, MASTER_VOL_NAME, 0);
            let mut elem_id_list = card_cntr.add_int_elems(
                &elem_id,
                1,
                VOLUME_MIN,
                VOLUME_MAX,
                VOLUME_STEP,
                1,
                Some(Self::VOL_TLV),
            )?;
            let elem_id = elem_id_list.remove(0);
            card_cntr.set_elem_writable(&elem_id, false);
            self.notified_elem_id_list.push(elem_id.clone());
            self.master_elem_id = Some(elem_id);
        }

        if T::HAS_HW_VOLUME {
            (0..T::analogue_output_count()).try_for_each(|i| {
                let name = format!(
                    "Line {:02} ({}) Playback Volume",
                    i + 1,
                    line_out_label::<T>(i)
                );
                let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, &name, 0);
                let mut elem_id_list = card_cntr.add_int_elems(
                    &elem_id,
                    1,
                    VOLUME_MIN,
                    VOLUME_MAX,
                    VOLUME_STEP,
                    1,
                    Some(Self::VOL_TLV),
                )?;
                let elem_id = elem_id_list.remove(0);
                if self.params.vol_sw_hw_switches[i] {
                    card_cntr.set_elem_writable(&elem_id, false);
                }
                self.notified_elem_id_list.push(elem_id.clone());
                self.vol_elem_ids.push(elem_id);
                Ok::<(), Error>(())
            })?;

            if T::LINE_OUT_HW_VOL {
                (0..T::analogue_output_count()).try_for_each(|i| {
                    let name = format!("Line Out {:02} Volume Control Playback Enum", i + 1);
                    let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, &name, 0);
                    let mut elem_id_list =
                        card_cntr.add_enum_elems(&elem_id, 1, 1, &["SW", "HW"])?;
                    self.sw_hw_elem_ids.push(elem_id_list.remove(0));
                    Ok::<(), Error>(())
                })?;
            }

            (0..T::analogue_output_count()).try_for_each(|i| {
                let name = format!("Line {:02} Mute Playback Switch", i + 1);
                let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, &name, 0);
                let mut elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1)?;
                let elem_id = elem_id_list.remove(0);
                self.notified_elem_id_list.push(elem_id.clone());
                self.mute_elem_ids.push(elem_id);
                Ok::<(), Error>(())
            })?;
        }

        // Mutes of S/PDIF and ADAT outputs are software switches of the configuration area.
        if T::HAS_MUX && sw_cfg_present {
            (T::analogue_output_count()..T::mute_switch_count()).try_for_each(|i| {
                let name = format!(
                    "{} Mute Playback Switch",
                    T::port_name(PortDirection::Output, i)
                );
                let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, &name, 0);
                let mut elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1)?;
                let elem_id = elem_id_list.remove(0);
                self.notified_elem_id_list.push(elem_id.clone());
                self.mute_elem_ids.push(elem_id);
                Ok::<(), Error>(())
            })?;
        }

        (0..T::BUTTON_COUNT).try_for_each(|i| {
            let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, BUTTON_NAMES[i], 0);
            let mut elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1)?;
            let elem_id = elem_id_list.remove(0);
            self.notified_elem_id_list.push(elem_id.clone());
            self.button_elem_ids.push(elem_id);
            Ok::<(), Error>(())
        })?;

        Ok(())
    }

    pub fn read(
        &mut self,
        unit: &mut SndScarlett2,
        sw_cfg: Option<&Scarlett2SoftwareConfig>,
        elem_id: &ElemId,
        elem_value: &mut ElemValue,
    ) -> Result<bool, Error> {
        if self
            .master_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            self.refresh_if_stale(unit, sw_cfg)?;
            elem_value.set_int(&[self.params.master_vol]);
            Ok(true)
        } else if let Some(i) = self.vol_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit, sw_cfg)?;
            elem_value.set_int(&[self.params.vols[i]]);
            Ok(true)
        } else if let Some(i) = self.sw_hw_elem_ids.iter().position(|id| id.eq(elem_id)) {
            elem_value.set_enum(&[self.params.vol_sw_hw_switches[i] as u32]);
            Ok(true)
        } else if let Some(i) = self.mute_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit, sw_cfg)?;
            elem_value.set_bool(&[self.params.mutes[i]]);
            Ok(true)
        } else if let Some(i) = self.button_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit, sw_cfg)?;
            elem_value.set_bool(&[self.params.buttons[i]]);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn write(
        &mut self,
        unit: &mut SndScarlett2,
        sw_cfg: &mut Option<Scarlett2SoftwareConfig>,
        save: &SaveHandle,
        elem_id: &ElemId,
        elem_value: &ElemValue,
    ) -> Result<bool, Error> {
        if let Some(i) = self.vol_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit, sw_cfg.as_ref())?;

            let vol = elem_value.int()[0].clamp(VOLUME_MIN, VOLUME_MAX);
            if self.params.vols[i] == vol {
                return Ok(true);
            }

            save.cancel();
            self.params.vols[i] = vol;
            T::write_config(
                unit,
                ConfigParameter::LineOutVolume,
                i,
                vol - VOLUME_BIAS,
                TIMEOUT_MS,
            )?;

            if !self.params.vol_sw_hw_switches[i] {
                if let Some(cfg) = sw_cfg {
                    cfg.set_volume(i, (vol - VOLUME_BIAS) as i16);
                    let (offset, length) = Scarlett2SoftwareConfig::volume_range(i);
                    T::commit_software_config(unit, cfg, offset, length, TIMEOUT_MS)?;
                }
            }

            save.arm();
            Ok(true)
        } else if let Some(i) = self.sw_hw_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit, sw_cfg.as_ref())?;

            let state = elem_value.enumerated()[0] > 0;
            if self.params.vol_sw_hw_switches[i] == state {
                return Ok(true);
            }

            save.cancel();
            self.params.vol_sw_hw_switches[i] = state;

            if state {
                // The fader becomes read-only and tracks the knob.
                self.pending_access_changes
                    .push((self.vol_elem_ids[i].clone(), false));
                T::write_config(
                    unit,
                    ConfigParameter::LineOutVolume,
                    i,
                    self.params.master_vol - VOLUME_BIAS,
                    TIMEOUT_MS,
                )?;
            } else {
                if let Some(cfg) = sw_cfg.as_ref() {
                    self.params.vols[i] =
                        (cfg.volume(i) as i32 + VOLUME_BIAS).clamp(VOLUME_MIN, VOLUME_MAX);
                }
                self.pending_access_changes
                    .push((self.vol_elem_ids[i].clone(), true));
                T::write_config(
                    unit,
                    ConfigParameter::LineOutVolume,
                    i,
                    self.params.vols[i] - VOLUME_BIAS,
                    TIMEOUT_MS,
                )?;
            }
            self.pending_value_changes.push(self.vol_elem_ids[i].clone());

            T::write_config(
                unit,
                ConfigParameter::SwHwVolumeSwitch,
                i,
                state as i32,
                TIMEOUT_MS,
            )?;

            self.refresh(unit, sw_cfg.as_ref())?;
            save.arm();
            Ok(true)
        } else if let Some(i) = self.mute_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit, sw_cfg.as_ref())?;

            let state = elem_value.boolean()[0];
            if self.params.mutes[i] == state {
                return Ok(true);
            }

            save.cancel();
            self.params.mutes[i] = state;

            if T::HAS_HW_VOLUME && i < T::analogue_output_count() {
                T::write_config(unit, ConfigParameter::OutputMutes, i, state as i32, TIMEOUT_MS)?;
            } else if let Some(cfg) = sw_cfg {
                let mask = if state {
                    cfg.mute_mask() | (1 << i)
                } else {
                    cfg.mute_mask() & !(1 << i)
                };
                cfg.set_mute_mask(mask);
                let (offset, length) = Scarlett2SoftwareConfig::mute_mask_range();
                T::commit_software_config(unit, cfg, offset, length, TIMEOUT_MS)?;
                self.mux_resync_required = true;
            } else {
                let msg = "mute is not available for the output";
                Err(Error::new(Scarlett2ControlError::NotSupported, msg))?;
            }

            save.arm();
            Ok(true)
        } else if let Some(i) = self.button_elem_ids.iter().position(|id| id.eq(elem_id)) {
            self.refresh_if_stale(unit, sw_cfg.as_ref())?;

            let state = elem_value.boolean()[0];
            if self.params.buttons[i] == state {
                return Ok(true);
            }

            save.cancel();
            self.params.buttons[i] = state;
            T::write_config(unit, ConfigParameter::Buttons, i, state as i32, TIMEOUT_MS)?;
            save.arm();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn drain_access_changes(&mut self) -> Vec<(ElemId, bool)> {
        self.pending_access_changes.drain(..).collect()
    }

    pub fn drain_value_changes(&mut self) -> Vec<ElemId> {
        self.pending_value_changes.drain(..).collect()
    }
}
