// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

use super::*;

const MSD_NAME: &str = "MSD Mode";
const LED_CUSTOM_NAME: &str = "LED Custom Colors";
const LED_LEVEL_NAMES: [&str; 3] = ["LED Clip Color", "LED Pre-Clip Color", "LED Good Color"];

const LED_COLOR_LABELS: [&str; 8] = [
    "Off",
    "Red",
    "Green",
    "Amber",
    "Blue",
    "Pink",
    "Light Blue",
    "Light Pink",
];

/// Mass storage device mode and gain halo LEDs.
pub struct MiscCtl<T: Scarlett2HardwareSpecification> {
    pub led_params: Scarlett2LedParameters,
    msd_switch: bool,
    msd_elem_id: Option<ElemId>,
    led_custom_elem_id: Option<ElemId>,
    led_level_elem_ids: Vec<ElemId>,
    led_halo_elem_ids: Vec<ElemId>,
    _phantom: PhantomData<T>,
}

impl<T: Scarlett2HardwareSpecification> MiscCtl<T> {
    pub fn new() -> Self {
        Self {
            led_params: T::create_led_parameters(),
            msd_switch: false,
            msd_elem_id: Default::default(),
            led_custom_elem_id: Default::default(),
            led_level_elem_ids: Default::default(),
            led_halo_elem_ids: Default::default(),
            _phantom: Default::default(),
        }
    }

    pub fn msd_switch(&self) -> bool {
        self.msd_switch
    }

    pub fn cache(&mut self, unit: &mut SndScarlett2) -> Result<(), Error> {
        if T::HAS_MSD_MODE {
            let raw = T::read_config(unit, ConfigParameter::MsdModeSwitch, 1, TIMEOUT_MS)?;
            self.msd_switch = raw[0] > 0;
        }

        T::cache_led_state(unit, &mut self.led_params, TIMEOUT_MS)
    }

    pub fn load(&mut self, card_cntr: &mut CardCntr, setup: u32) -> Result<(), Error> {
        // When MSD mode is off the switch is hidden unless asked for.
        if T::HAS_MSD_MODE && (self.msd_switch || setup & DEVICE_SETUP_MSD_ENABLE > 0) {
            let elem_id = ElemId::new_by_name(ElemIfaceType::Card, MSD_NAME, 0);
            let mut elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1)?;
            self.msd_elem_id = Some(elem_id_list.remove(0));
        }

        if T::GAIN_HALO_COUNT > 0 {
            let elem_id = ElemId::new_by_name(ElemIfaceType::Card, LED_CUSTOM_NAME, 0);
            let mut elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1)?;
            self.led_custom_elem_id = Some(elem_id_list.remove(0));

            LED_LEVEL_NAMES.iter().try_for_each(|name| {
                let elem_id = ElemId::new_by_name(ElemIfaceType::Card, name, 0);
                let mut elem_id_list =
                    card_cntr.add_enum_elems(&elem_id, 1, 1, &LED_COLOR_LABELS)?;
                self.led_level_elem_ids.push(elem_id_list.remove(0));
                Ok::<(), Error>(())
            })?;

            (0..T::GAIN_HALO_COUNT).try_for_each(|i| {
                let name = format!("LED {} Custom Color", i);
                let elem_id = ElemId::new_by_name(ElemIfaceType::Card, &name, 0);
                let mut elem_id_list =
                    card_cntr.add_enum_elems(&elem_id, 1, 1, &LED_COLOR_LABELS)?;
                self.led_halo_elem_ids.push(elem_id_list.remove(0));
                Ok::<(), Error>(())
            })?;
        }

        Ok(())
    }

    pub fn read(&mut self, elem_id: &ElemId, elem_value: &mut ElemValue) -> Result<bool, Error> {
        if self
            .msd_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            elem_value.set_bool(&[self.msd_switch]);
            Ok(true)
        } else if self
            .led_custom_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            elem_value.set_bool(&[self.led_params.custom]);
            Ok(true)
        } else if let Some(i) = self.led_level_elem_ids.iter().position(|id| id.eq(elem_id)) {
            elem_value.set_enum(&[self.led_params.level_colors[i] as u32]);
            Ok(true)
        } else if let Some(i) = self.led_halo_elem_ids.iter().position(|id| id.eq(elem_id)) {
            elem_value.set_enum(&[self.led_params.halo_colors[i] as u32]);
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
            .msd_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            let state = elem_value.boolean()[0];
            if self.msd_switch == state {
                return Ok(true);
            }

            save.cancel();
            self.msd_switch = state;
            T::write_config(
                unit,
                ConfigParameter::MsdModeSwitch,
                0,
                state as i32,
                TIMEOUT_MS,
            )?;
            save.arm();
            Ok(true)
        } else if self
            .led_custom_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            let state = elem_value.boolean()[0];
            if self.led_params.custom == state {
                return Ok(true);
            }

            save.cancel();
            self.led_params.custom = state;
            let value = T::led_custom_write_value(state);
            T::write_config(unit, ConfigParameter::GainHaloEnable, 0, value, TIMEOUT_MS)?;
            save.arm();
            Ok(true)
        } else if let Some(i) = self.led_level_elem_ids.iter().position(|id| id.eq(elem_id)) {
            let color = elem_value.enumerated()[0].min(LED_COLOR_COUNT as u32 - 1) as usize;
            if self.led_params.level_colors[i] == color {
                return Ok(true);
            }

            save.cancel();
            self.led_params.level_colors[i] = color;
            T::write_config(
                unit,
                ConfigParameter::GainHaloLevels,
                i,
                color as i32,
                TIMEOUT_MS,
            )?;
            save.arm();
            Ok(true)
        } else if let Some(i) = self.led_halo_elem_ids.iter().position(|id| id.eq(elem_id)) {
            let color = elem_value.enumerated()[0].min(LED_COLOR_COUNT as u32 - 1) as usize;
            if self.led_params.halo_colors[i] == color {
                return Ok(true);
            }

            save.cancel();
            self.led_params.halo_colors[i] = color;
            T::write_config(
                unit,
                ConfigParameter::GainHaloLeds,
                i,
                color as i32,
                TIMEOUT_MS,
            )?;
            save.arm();
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
