// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

use super::*;

/// Source selection of every destination of the mux.
pub struct MuxCtl<T: Scarlett2HardwareSpecification> {
    pub params: Scarlett2MuxParameters,
    src_elem_ids: Vec<ElemId>,
    src_labels: Vec<String>,
    _phantom: PhantomData<T>,
}

impl<T: Scarlett2HardwareSpecification> MuxCtl<T> {
    pub fn new() -> Self {
        Self {
            params: T::create_mux_parameters(),
            src_elem_ids: Default::default(),
            src_labels: Default::default(),
            _phantom: Default::default(),
        }
    }

    /// Read the routing back, overlay the view of the configuration area, and transmit the
    /// merged table so that the unit agrees with the mirror.
    pub fn cache(
        &mut self,
        unit: &mut SndScarlett2,
        sw_cfg: Option<&Scarlett2SoftwareConfig>,
        mutes: &[bool],
    ) -> Result<(), Error> {
        if !T::HAS_MUX {
            return Ok(());
        }

        T::cache_mux(unit, &mut self.params, TIMEOUT_MS)?;
        if let Some(cfg) = sw_cfg {
            T::merge_software_routing(cfg, &mut self.params);
        }
        T::update_mux(unit, &self.params, mutes, TIMEOUT_MS)
    }

    pub fn load(&mut self, card_cntr: &mut CardCntr) -> Result<(), Error> {
        if !T::HAS_MUX {
            return Ok(());
        }

        // The first entry of every selector expresses no connection.
        self.src_labels = std::iter::once("Off".to_string())
            .chain((0..T::input_count()).map(|i| T::port_name(PortDirection::Input, i)))
            .collect();

        (0..T::output_count()).try_for_each(|i| {
            let name = format!("{} Source", T::port_name(PortDirection::Output, i));
            let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, &name, 0);
            let mut elem_id_list =
                card_cntr.add_enum_elems(&elem_id, 1, 1, &self.src_labels)?;
            self.src_elem_ids.push(elem_id_list.remove(0));
            Ok(())
        })
    }

    pub fn read(&mut self, elem_id: &ElemId, elem_value: &mut ElemValue) -> Result<bool, Error> {
        if let Some(i) = self.src_elem_ids.iter().position(|id| id.eq(elem_id)) {
            let pos = self.params.routes[i].map(|src| src as u32 + 1).unwrap_or(0);
            elem_value.set_enum(&[pos]);
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
        mutes: &[bool],
        elem_id: &ElemId,
        elem_value: &ElemValue,
    ) -> Result<bool, Error> {
        if let Some(dst) = self.src_elem_ids.iter().position(|id| id.eq(elem_id)) {
            let pos = elem_value.enumerated()[0] as usize;
            let src = pos
                .checked_sub(1)
                .filter(|&src| src < T::input_count());
            if self.params.routes[dst] == src {
                return Ok(true);
            }

            save.cancel();

            // The configuration area is normalised first, then the route takes effect.
            if let Some(cfg) = sw_cfg {
                let dirty = T::update_software_routing(cfg, src, dst);
                dirty.iter().try_for_each(|&(offset, length)| {
                    T::commit_software_config(unit, cfg, offset, length, TIMEOUT_MS)
                })?;
            }

            self.params.routes[dst] = src;
            T::update_mux(unit, &self.params, mutes, TIMEOUT_MS)?;

            save.arm();
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
