// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! The surface of control elements towards the host mixer framework.
//!
//! The module keeps the registry of control elements; identifier, description, cached value, and
//! access mode per element. The host framework itself stays outside; events towards it are
//! queued and drained by the runtime.

use {
    super::*,
    std::fmt,
    tracing::{debug, debug_span},
};

/// The interface a control element belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElemIfaceType {
    Card,
    Mixer,
    Pcm,
}

/// Identifier of a control element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElemId {
    iface: ElemIfaceType,
    name: String,
    index: u32,
}

impl ElemId {
    pub fn new_by_name(iface: ElemIfaceType, name: &str, index: u32) -> Self {
        Self {
            iface,
            name: name.to_string(),
            index,
        }
    }

    pub fn iface(&self) -> ElemIfaceType {
        self.iface
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for ElemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{}:{}", self.iface, self.name, self.index)
    }
}

/// Range of decibel representation in units of 0.01 dB.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DbInterval {
    pub min: i32,
    pub max: i32,
    pub linear: bool,
    pub mute_avail: bool,
}

/// Description of a control element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElemInfo {
    Boolean {
        value_count: usize,
    },
    Integer {
        value_count: usize,
        min: i32,
        max: i32,
        step: i32,
        db: Option<DbInterval>,
    },
    Enumerated {
        value_count: usize,
        labels: Vec<String>,
    },
}

/// Container of values of a control element.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ElemValue {
    bools: Vec<bool>,
    ints: Vec<i32>,
    enums: Vec<u32>,
}

impl ElemValue {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set_bool(&mut self, vals: &[bool]) {
        self.bools = vals.to_vec();
    }

    pub fn boolean(&self) -> &[bool] {
        &self.bools
    }

    pub fn set_int(&mut self, vals: &[i32]) {
        self.ints = vals.to_vec();
    }

    pub fn int(&self) -> &[i32] {
        &self.ints
    }

    pub fn set_enum(&mut self, vals: &[u32]) {
        self.enums = vals.to_vec();
    }

    pub fn enumerated(&self) -> &[u32] {
        &self.enums
    }

    pub fn equal(&self, other: &Self) -> bool {
        self.eq(other)
    }
}

/// The kind of event queued towards the host framework.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElemEventMask {
    Value,
    Info,
}

struct CardEntry {
    elem_id: ElemId,
    elem_info: ElemInfo,
    elem_value: ElemValue,
    writable: bool,
}

/// Registry of control elements.
#[derive(Default)]
pub struct CardCntr {
    entries: Vec<CardEntry>,
    events: Vec<(ElemId, ElemEventMask)>,
}

/// Operations of a control model against the unit.
pub trait CtlModel<O: Sized> {
    fn cache(&mut self, unit: &mut O) -> Result<(), Error>;
    fn load(&mut self, card_cntr: &mut CardCntr) -> Result<(), Error>;
    fn read(
        &mut self,
        unit: &mut O,
        elem_id: &ElemId,
        elem_value: &mut ElemValue,
    ) -> Result<bool, Error>;
    fn write(
        &mut self,
        unit: &mut O,
        elem_id: &ElemId,
        old: &ElemValue,
        new: &ElemValue,
    ) -> Result<bool, Error>;
}

/// Operations of a control model for measured elements.
pub trait MeasureModel<O: Sized> {
    fn get_measure_elem_list(&mut self, elem_id_list: &mut Vec<ElemId>);
    fn measure_elem(
        &mut self,
        unit: &mut O,
        elem_id: &ElemId,
        elem_value: &mut ElemValue,
    ) -> Result<bool, Error>;
}

/// Operations of a control model for elements refreshed by notification.
pub trait NotifyModel<O: Sized, N> {
    fn get_notified_elem_list(&mut self, elem_id_list: &mut Vec<ElemId>);
    fn parse_notification(&mut self, unit: &mut O, notice: &N) -> Result<(), Error>;
}

impl CardCntr {
    fn register_elems(
        &mut self,
        elem_id: &ElemId,
        elem_count: usize,
        elem_info: ElemInfo,
    ) -> Result<Vec<ElemId>, Error> {
        let _enter = debug_span!("register").entered();

        let elem_id_list: Vec<ElemId> = (0..elem_count)
            .map(|i| ElemId::new_by_name(elem_id.iface(), elem_id.name(), elem_id.index() + i as u32))
            .collect();

        elem_id_list.iter().try_for_each(|elem_id| {
            if self.entries.iter().any(|entry| entry.elem_id.eq(elem_id)) {
                let msg = format!("{} is already added", elem_id);
                Err(Error::new(Scarlett2ControlError::BadArgument, &msg))
            } else {
                Ok(())
            }
        })?;

        elem_id_list.iter().for_each(|elem_id| {
            debug!(name = elem_id.name(), index = elem_id.index());
            self.entries.push(CardEntry {
                elem_id: elem_id.clone(),
                elem_info: elem_info.clone(),
                elem_value: ElemValue::new(),
                writable: true,
            });
        });

        Ok(elem_id_list)
    }

    pub fn add_bool_elems(
        &mut self,
        elem_id: &ElemId,
        elem_count: usize,
        value_count: usize,
    ) -> Result<Vec<ElemId>, Error> {
        self.register_elems(elem_id, elem_count, ElemInfo::Boolean { value_count })
    }

    pub fn add_int_elems(
        &mut self,
        elem_id: &ElemId,
        elem_count: usize,
        min: i32,
        max: i32,
        step: i32,
        value_count: usize,
        db: Option<DbInterval>,
    ) -> Result<Vec<ElemId>, Error> {
        self.register_elems(
            elem_id,
            elem_count,
            ElemInfo::Integer {
                value_count,
                min,
                max,
                step,
                db,
            },
        )
    }

    pub fn add_enum_elems<O: AsRef<str>>(
        &mut self,
        elem_id: &ElemId,
        elem_count: usize,
        value_count: usize,
        labels: &[O],
    ) -> Result<Vec<ElemId>, Error> {
        let labels = labels
            .iter()
            .map(|label| label.as_ref().to_string())
            .collect();
        self.register_elems(
            elem_id,
            elem_count,
            ElemInfo::Enumerated {
                value_count,
                labels,
            },
        )
    }

    pub fn elem_id_list(&self) -> Vec<ElemId> {
        self.entries
            .iter()
            .map(|entry| entry.elem_id.clone())
            .collect()
    }

    pub fn elem_info(&self, elem_id: &ElemId) -> Option<&ElemInfo> {
        self.entries
            .iter()
            .find(|entry| entry.elem_id.eq(elem_id))
            .map(|entry| &entry.elem_info)
    }

    /// Flip the access mode of the element, announcing the change.
    pub fn set_elem_writable(&mut self, elem_id: &ElemId, writable: bool) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.elem_id.eq(elem_id))
        {
            if entry.writable != writable {
                entry.writable = writable;
                self.events.push((elem_id.clone(), ElemEventMask::Info));
            }
        }
    }

    pub fn read_elem_value(&self, elem_id: &ElemId, elem_value: &mut ElemValue) -> Result<(), Error> {
        self.entries
            .iter()
            .find(|entry| entry.elem_id.eq(elem_id))
            .map(|entry| *elem_value = entry.elem_value.clone())
            .ok_or_else(|| {
                let msg = format!("no such element: {}", elem_id);
                Error::new(Scarlett2ControlError::BadArgument, &msg)
            })
    }

    /// Events queued towards the host framework since the last drain.
    pub fn drain_elem_events(&mut self) -> Vec<(ElemId, ElemEventMask)> {
        self.events.drain(..).collect()
    }

    /// Dispatch a value written by the host framework into the control model.
    pub fn dispatch_elem_event<O, T>(
        &mut self,
        unit: &mut O,
        elem_id: &ElemId,
        elem_value: &ElemValue,
        ctl_model: &mut T,
    ) -> Result<(), Error>
    where
        O: Sized,
        T: CtlModel<O>,
    {
        let _enter = debug_span!("value").entered();

        let pos = self
            .entries
            .iter()
            .position(|entry| entry.elem_id.eq(elem_id))
            .ok_or_else(|| {
                let msg = format!("no such element: {}", elem_id);
                Error::new(Scarlett2ControlError::BadArgument, &msg)
            })?;

        if !self.entries[pos].writable {
            let msg = format!("element is read-only: {}", elem_id);
            Err(Error::new(Scarlett2ControlError::BadArgument, &msg))?;
        }

        let old = self.entries[pos].elem_value.clone();
        if old.equal(elem_value) {
            return Ok(());
        }

        let res = ctl_model.write(unit, elem_id, &old, elem_value);
        debug!(element = %elem_id, ?res);

        if res? {
            self.entries[pos].elem_value = elem_value.clone();
            self.events.push((elem_id.clone(), ElemEventMask::Value));
        }

        Ok(())
    }

    /// Re-read the listed elements after a notification, announcing the values which changed.
    pub fn dispatch_notification<O, N, T>(
        &mut self,
        unit: &mut O,
        notification: &N,
        elem_id_list: &[ElemId],
        ctl_model: &mut T,
    ) -> Result<(), Error>
    where
        O: Sized,
        T: CtlModel<O> + NotifyModel<O, N>,
    {
        let _enter = debug_span!("notification").entered();

        ctl_model.parse_notification(unit, notification)?;

        elem_id_list.iter().try_for_each(|elem_id| {
            let pos = match self
                .entries
                .iter()
                .position(|entry| entry.elem_id.eq(elem_id))
            {
                Some(pos) => pos,
                None => return Ok(()),
            };

            let mut elem_value = ElemValue::new();
            if ctl_model.read(unit, elem_id, &mut elem_value)? {
                if !self.entries[pos].elem_value.equal(&elem_value) {
                    self.entries[pos].elem_value = elem_value;
                    self.events.push((elem_id.clone(), ElemEventMask::Value));
                }
            }
            Ok(())
        })
    }

    /// Read the listed measured elements from the unit.
    pub fn measure_elems<O, T>(
        &mut self,
        unit: &mut O,
        elem_id_list: &[ElemId],
        ctl_model: &mut T,
    ) -> Result<(), Error>
    where
        O: Sized,
        T: CtlModel<O> + MeasureModel<O>,
    {
        let _enter = debug_span!("measure").entered();

        elem_id_list.iter().try_for_each(|elem_id| {
            let pos = match self
                .entries
                .iter()
                .position(|entry| entry.elem_id.eq(elem_id))
            {
                Some(pos) => pos,
                None => return Ok(()),
            };

            let mut elem_value = ElemValue::new();
            if ctl_model.measure_elem(unit, elem_id, &mut elem_value)? {
                self.entries[pos].elem_value = elem_value;
                self.events.push((elem_id.clone(), ElemEventMask::Value));
            }
            Ok(())
        })
    }

    /// Replace the cached value of the element and announce the change.
    pub fn announce_elem_value(&mut self, elem_id: &ElemId, elem_value: &ElemValue) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.elem_id.eq(elem_id))
        {
            if !entry.elem_value.equal(elem_value) {
                entry.elem_value = elem_value.clone();
                self.events.push((elem_id.clone(), ElemEventMask::Value));
            }
        }
    }

    /// Fill the cached value of the element, without announcing; used once at start.
    pub fn cache_elem_value(&mut self, elem_id: &ElemId, elem_value: &ElemValue) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.elem_id.eq(elem_id))
        {
            entry.elem_value = elem_value.clone();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn registration_and_lookup() {
        let mut card_cntr = CardCntr::default();

        let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, "Something Playback Volume", 0);
        let elem_id_list = card_cntr
            .add_int_elems(&elem_id, 2, 0, 127, 1, 1, None)
            .unwrap();
        assert_eq!(elem_id_list.len(), 2);
        assert_eq!(elem_id_list[1].index(), 1);

        // Re-registration of the same identifier is refused.
        assert!(card_cntr.add_bool_elems(&elem_id, 1, 1).is_err());

        match card_cntr.elem_info(&elem_id_list[0]).unwrap() {
            ElemInfo::Integer { max, .. } => assert_eq!(*max, 127),
            _ => unreachable!(),
        }
    }

    struct NullModel;

    impl CtlModel<()> for NullModel {
        fn cache(&mut self, _: &mut ()) -> Result<(), Error> {
            Ok(())
        }

        fn load(&mut self, _: &mut CardCntr) -> Result<(), Error> {
            Ok(())
        }

        fn read(&mut self, _: &mut (), _: &ElemId, _: &mut ElemValue) -> Result<bool, Error> {
            Ok(false)
        }

        fn write(
            &mut self,
            _: &mut (),
            _: &ElemId,
            _: &ElemValue,
            _: &ElemValue,
        ) -> Result<bool, Error> {
            Ok(true)
        }
    }

    #[test]
    fn write_dispatch_updates_cache_and_queues_event() {
        let mut card_cntr = CardCntr::default();
        let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, "Something Playback Switch", 0);
        let elem_id_list = card_cntr.add_bool_elems(&elem_id, 1, 1).unwrap();

        let mut elem_value = ElemValue::new();
        elem_value.set_bool(&[true]);
        card_cntr
            .dispatch_elem_event(&mut (), &elem_id_list[0], &elem_value, &mut NullModel)
            .unwrap();

        let mut cached = ElemValue::new();
        card_cntr
            .read_elem_value(&elem_id_list[0], &mut cached)
            .unwrap();
        assert_eq!(cached.boolean(), &[true]);

        let events = card_cntr.drain_elem_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].1, ElemEventMask::Value);
    }

    #[test]
    fn read_only_elements_refuse_writes() {
        let mut card_cntr = CardCntr::default();
        let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, "Something Playback Volume", 0);
        let elem_id_list = card_cntr
            .add_int_elems(&elem_id, 1, 0, 127, 1, 1, None)
            .unwrap();

        card_cntr.set_elem_writable(&elem_id_list[0], false);
        assert_eq!(card_cntr.drain_elem_events().len(), 1);

        let mut elem_value = ElemValue::new();
        elem_value.set_int(&[10]);
        let err = card_cntr
            .dispatch_elem_event(&mut (), &elem_id_list[0], &elem_value, &mut NullModel)
            .unwrap_err();
        assert_eq!(
            err.kind::<Scarlett2ControlError>(),
            Some(Scarlett2ControlError::BadArgument)
        );
    }
}
