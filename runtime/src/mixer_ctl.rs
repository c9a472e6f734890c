// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

use super::*;

fn mix_letter(mix: usize) -> char {
    (b'A' + mix as u8) as char
}

/// Gains and mutes of the cells of the matrix mixer.
pub struct MixerCtl<T: Scarlett2HardwareSpecification> {
    pub params: Scarlett2MixerParameters,
    gain_elem_ids: Vec<ElemId>,
    mute_elem_ids: Vec<ElemId>,
    _phantom: PhantomData<T>,
}

impl<T: Scarlett2HardwareSpecification> MixerCtl<T> {
    const GAIN_TLV: DbInterval = DbInterval {
        min: MIXER_GAIN_MIN_DB * 100,
        max: MIXER_GAIN_MAX_DB * 100,
        linear: false,
        mute_avail: false,
    };

    pub fn new() -> Self {
        Self {
            params: T::create_mixer_parameters(),
            gain_elem_ids: Default::default(),
            mute_elem_ids: Default::default(),
            _phantom: Default::default(),
        }
    }

    fn cell_of(&self, list: &[ElemId], elem_id: &ElemId) -> Option<(usize, usize)> {
        list.iter()
            .position(|id| id.eq(elem_id))
            .map(|pos| (pos / T::mixer_input_count(), pos % T::mixer_input_count()))
    }

    pub fn cache(
        &mut self,
        unit: &mut SndScarlett2,
        sw_cfg: Option<&Scarlett2SoftwareConfig>,
    ) -> Result<(), Error> {
        if !T::HAS_MIXER {
            return Ok(());
        }

        match sw_cfg {
            Some(cfg) => {
                (0..T::mixer_output_count()).for_each(|mix| {
                    let mute_mask = cfg.mixer_mute_mask(mix);
                    (0..T::mixer_input_count()).for_each(|input| {
                        if let Some(raw) = cfg.mixer_gain(mix, input) {
                            let level = float_to_mixer_level(raw) + MIXER_GAIN_BIAS;
                            self.params.gains[mix][input] = level as usize;
                        }
                        self.params.mutes[mix][input] = mute_mask & (1 << input) > 0;
                    });
                });
            }
            None => {
                (0..T::mixer_output_count())
                    .try_for_each(|mix| T::cache_mix(unit, &mut self.params, mix, TIMEOUT_MS))?;
            }
        }

        // The whole matrix is transmitted so that the unit agrees with the mirror.
        (0..T::mixer_output_count())
            .try_for_each(|mix| T::update_mix(unit, &self.params, mix, TIMEOUT_MS))?;

        Ok(())
    }

    pub fn load(&mut self, card_cntr: &mut CardCntr) -> Result<(), Error> {
        if !T::HAS_MIXER {
            return Ok(());
        }

        (0..T::mixer_output_count()).try_for_each(|mix| {
            (0..T::mixer_input_count()).try_for_each(|input| {
                let name = format!(
                    "Mix {} Input {:02} Playback Volume",
                    mix_letter(mix),
                    input + 1
                );
                let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, &name, 0);
                let mut elem_id_list = card_cntr.add_int_elems(
                    &elem_id,
                    1,
                    0,
                    MIXER_GAIN_MAX,
                    MIXER_GAIN_STEP,
                    1,
                    Some(Self::GAIN_TLV),
                )?;
                self.gain_elem_ids.push(elem_id_list.remove(0));

                let name = format!(
                    "Mix {} Input {:02} Playback Switch",
                    mix_letter(mix),
                    input + 1
                );
                let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, &name, 0);
                let mut elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1)?;
                self.mute_elem_ids.push(elem_id_list.remove(0));
                Ok(())
            })
        })
    }

    pub fn read(
        &mut self,
        elem_id: &ElemId,
        elem_value: &mut ElemValue,
    ) -> Result<bool, Error> {
        if let Some((mix, input)) = self.cell_of(&self.gain_elem_ids, elem_id) {
            elem_value.set_int(&[self.params.gains[mix][input] as i32]);
            Ok(true)
        } else if let Some((mix, input)) = self.cell_of(&self.mute_elem_ids, elem_id) {
            elem_value.set_bool(&[self.params.mutes[mix][input]]);
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
        if let Some((mix, input)) = self.cell_of(&self.gain_elem_ids, elem_id) {
            let level = elem_value.int()[0].clamp(0, MIXER_GAIN_MAX) as usize;
            if self.params.gains[mix][input] == level {
                return Ok(true);
            }

            save.cancel();
            self.params.gains[mix][input] = level;
            T::update_mix(unit, &self.params, mix, TIMEOUT_MS)?;

            if let Some(cfg) = sw_cfg {
                if cfg.set_mixer_gain(mix, input, level) {
                    let (offset, length) =
                        Scarlett2SoftwareConfig::mixer_gain_range(mix, input).unwrap();
                    T::commit_software_config(unit, cfg, offset, length, TIMEOUT_MS)?;
                }
            }

            save.arm();
            Ok(true)
        } else if let Some((mix, input)) = self.cell_of(&self.mute_elem_ids, elem_id) {
            let state = elem_value.boolean()[0];
            if self.params.mutes[mix][input] == state {
                return Ok(true);
            }

            save.cancel();
            self.params.mutes[mix][input] = state;

            if let Some(cfg) = sw_cfg {
                let mask = self.params.mutes[mix]
                    .iter()
                    .enumerate()
                    .filter(|(_, &mute)| mute)
                    .fold(0u32, |mask, (i, _)| mask | (1 << i));
                cfg.set_mixer_mute_mask(mix, mask);
                let (offset, length) = Scarlett2SoftwareConfig::mixer_mute_mask_range(mix);
                T::commit_software_config(unit, cfg, offset, length, TIMEOUT_MS)?;
            }

            T::update_mix(unit, &self.params, mix, TIMEOUT_MS)?;
            save.arm();
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
