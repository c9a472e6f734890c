// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

use super::*;

const METER_NAME: &str = "Level Meter";
const SYNC_STATUS_NAME: &str = "Sync Status";

const SYNC_LABELS: [&str; 2] = ["Unlocked", "Locked"];

/// Level meters and sampling clock synchronisation state.
pub struct MeterCtl<T: Scarlett2HardwareSpecification> {
    pub measured_elem_id_list: Vec<ElemId>,
    pub notified_elem_id_list: Vec<ElemId>,
    meter_elem_id: Option<ElemId>,
    sync_elem_id: Option<ElemId>,
    sync_locked: bool,
    flags: Arc<NotificationFlags>,
    _phantom: PhantomData<T>,
}

impl<T: Scarlett2HardwareSpecification> MeterCtl<T> {
    pub fn new(flags: Arc<NotificationFlags>) -> Self {
        Self {
            measured_elem_id_list: Default::default(),
            notified_elem_id_list: Default::default(),
            meter_elem_id: Default::default(),
            sync_elem_id: Default::default(),
            sync_locked: false,
            flags,
            _phantom: Default::default(),
        }
    }

    pub fn cache(&mut self, unit: &mut SndScarlett2) -> Result<(), Error> {
        T::read_sync_status(unit, TIMEOUT_MS).map(|locked| {
            self.sync_locked = locked;
            self.flags.clear_sync();
        })
    }

    pub fn load(&mut self, card_cntr: &mut CardCntr) -> Result<(), Error> {
        if T::HAS_METERS {
            let elem_id = ElemId::new_by_name(ElemIfaceType::Pcm, METER_NAME, 0);
            let mut elem_id_list =
                card_cntr.add_int_elems(&elem_id, 1, METER_LEVEL_MIN, METER_LEVEL_MAX,
                    METER_LEVEL_STEP, T::METER_COUNT, None)?;
            let elem_id = elem_id_list.remove(0);
            card_cntr.set_elem_writable(&elem_id, false);
            self.measured_elem_id_list.push(elem_id.clone());
            self.meter_elem_id = Some(elem_id);
        }

        let elem_id = ElemId::new_by_name(ElemIfaceType::Card, SYNC_STATUS_NAME, 0);
        let mut elem_id_list = card_cntr.add_enum_elems(&elem_id, 1, 1, &SYNC_LABELS)?;
        let elem_id = elem_id_list.remove(0);
        card_cntr.set_elem_writable(&elem_id, false);
        self.notified_elem_id_list.push(elem_id.clone());
        self.sync_elem_id = Some(elem_id);

        Ok(())
    }

    pub fn read(
        &mut self,
        unit: &mut SndScarlett2,
        elem_id: &ElemId,
        elem_value: &mut ElemValue,
    ) -> Result<bool, Error> {
        if self
            .meter_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            let levels = T::read_meter_levels(unit, TIMEOUT_MS)?;
            let vals: Vec<i32> = levels.iter().map(|&level| level as i32).collect();
            elem_value.set_int(&vals);
            Ok(true)
        } else if self
            .sync_elem_id
            .as_ref()
            .map(|id| id.eq(elem_id))
            .unwrap_or_default()
        {
            if self.flags.sync_stale() {
                self.cache(unit)?;
            }
            elem_value.set_enum(&[self.sync_locked as u32]);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
