// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

use super::*;

/// Control model shared by every supported model, parameterised by its specification.
pub struct ScarlettCtlModel<T: Scarlett2HardwareSpecification> {
    output_ctl: OutputCtl<T>,
    input_ctl: InputCtl<T>,
    mixer_ctl: MixerCtl<T>,
    mux_ctl: MuxCtl<T>,
    meter_ctl: MeterCtl<T>,
    monitor_ctl: MonitorCtl<T>,
    misc_ctl: MiscCtl<T>,
    sw_cfg: Option<Scarlett2SoftwareConfig>,
    save: SaveHandle,
    flags: Arc<NotificationFlags>,
    setup: u32,
}

impl<T: Scarlett2HardwareSpecification> ScarlettCtlModel<T> {
    pub fn new(flags: &Arc<NotificationFlags>, save: SaveHandle, setup: u32) -> Self {
        Self {
            output_ctl: OutputCtl::new(Arc::clone(flags)),
            input_ctl: InputCtl::new(Arc::clone(flags)),
            mixer_ctl: MixerCtl::new(),
            mux_ctl: MuxCtl::new(),
            meter_ctl: MeterCtl::new(Arc::clone(flags)),
            monitor_ctl: MonitorCtl::new(Arc::clone(flags)),
            misc_ctl: MiscCtl::new(),
            sw_cfg: None,
            save,
            flags: Arc::clone(flags),
            setup,
        }
    }

    pub fn drain_access_changes(&mut self) -> Vec<(ElemId, bool)> {
        self.output_ctl.drain_access_changes()
    }

    pub fn drain_value_changes(&mut self) -> Vec<ElemId> {
        self.output_ctl.drain_value_changes()
    }
}

impl<T: Scarlett2HardwareSpecification> CtlModel<SndScarlett2> for ScarlettCtlModel<T> {
    fn cache(&mut self, unit: &mut SndScarlett2) -> Result<(), Error> {
        self.input_ctl.cache(unit)?;
        self.misc_ctl.cache(unit)?;
        self.monitor_ctl.cache(unit)?;
        self.meter_ctl.cache(unit)?;

        self.sw_cfg = T::cache_software_config(unit, TIMEOUT_MS)?;
        if T::HAS_SOFTWARE_CONFIG && self.sw_cfg.is_none() {
            warn!(
                "the software configuration area is unusable; \
                 proceeding with significantly lower functionality"
            );
        }

        self.output_ctl.cache(unit, self.sw_cfg.as_ref())?;
        self.mux_ctl
            .cache(unit, self.sw_cfg.as_ref(), &self.output_ctl.params.mutes)?;
        self.mixer_ctl.cache(unit, self.sw_cfg.as_ref())?;

        // The reconciliation above rewrote volumes, routing, and mixes; one deferred save
        // persists the merged state.
        if self.sw_cfg.is_some() {
            self.save.arm();
        }

        Ok(())
    }

    fn load(&mut self, card_cntr: &mut CardCntr) -> Result<(), Error> {
        self.output_ctl.load(card_cntr, self.sw_cfg.is_some())?;
        self.input_ctl.load(card_cntr)?;
        self.mux_ctl.load(card_cntr)?;
        self.mixer_ctl.load(card_cntr)?;
        self.meter_ctl.load(card_cntr)?;
        self.monitor_ctl.load(card_cntr)?;
        self.misc_ctl.load(card_cntr, self.setup)?;
        Ok(())
    }

    fn read(
        &mut self,
        unit: &mut SndScarlett2,
        elem_id: &ElemId,
        elem_value: &mut ElemValue,
    ) -> Result<bool, Error> {
        if self
            .output_ctl
            .read(unit, self.sw_cfg.as_ref(), elem_id, elem_value)?
        {
            Ok(true)
        } else if self.input_ctl.read(unit, elem_id, elem_value)? {
            Ok(true)
        } else if self.mixer_ctl.read(elem_id, elem_value)? {
            Ok(true)
        } else if self.mux_ctl.read(elem_id, elem_value)? {
            Ok(true)
        } else if self.meter_ctl.read(unit, elem_id, elem_value)? {
            Ok(true)
        } else if self.monitor_ctl.read(unit, elem_id, elem_value)? {
            Ok(true)
        } else if self.misc_ctl.read(elem_id, elem_value)? {
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn write(
        &mut self,
        unit: &mut SndScarlett2,
        elem_id: &ElemId,
        _old: &ElemValue,
        new: &ElemValue,
    ) -> Result<bool, Error> {
        if self
            .output_ctl
            .write(unit, &mut self.sw_cfg, &self.save, elem_id, new)?
        {
            // A mute recorded in the configuration area reaches the unit through the mux.
            if self.output_ctl.mux_resync_required {
                self.output_ctl.mux_resync_required = false;
                T::update_mux(
                    unit,
                    &self.mux_ctl.params,
                    &self.output_ctl.params.mutes,
                    TIMEOUT_MS,
                )?;
            }
            Ok(true)
        } else if self.input_ctl.write(unit, &self.save, elem_id, new)? {
            Ok(true)
        } else if self
            .mixer_ctl
            .write(unit, &mut self.sw_cfg, &self.save, elem_id, new)?
        {
            Ok(true)
        } else if self.mux_ctl.write(
            unit,
            &mut self.sw_cfg,
            &self.save,
            &self.output_ctl.params.mutes,
            elem_id,
            new,
        )? {
            Ok(true)
        } else if self.monitor_ctl.write(unit, &self.save, elem_id, new)? {
            Ok(true)
        } else if self.misc_ctl.write(unit, &self.save, elem_id, new)? {
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

impl<T: Scarlett2HardwareSpecification> NotifyModel<SndScarlett2, u32> for ScarlettCtlModel<T> {
    fn get_notified_elem_list(&mut self, elem_id_list: &mut Vec<ElemId>) {
        elem_id_list.extend_from_slice(&self.output_ctl.notified_elem_id_list);
        elem_id_list.extend_from_slice(&self.input_ctl.notified_elem_id_list);
        elem_id_list.extend_from_slice(&self.monitor_ctl.notified_elem_id_list);
        elem_id_list.extend_from_slice(&self.meter_ctl.notified_elem_id_list);
    }

    fn parse_notification(&mut self, _: &mut SndScarlett2, notice: &u32) -> Result<(), Error> {
        // The dispatcher thread raised the flags already; raising them again is harmless and
        // covers notifications injected by other means.
        self.flags.mark(*notice);
        debug!(mask = format!("{:08x}", notice));
        Ok(())
    }
}

impl<T: Scarlett2HardwareSpecification> MeasureModel<SndScarlett2> for ScarlettCtlModel<T> {
    fn get_measure_elem_list(&mut self, elem_id_list: &mut Vec<ElemId>) {
        elem_id_list.extend_from_slice(&self.meter_ctl.measured_elem_id_list);
    }

    fn measure_elem(
        &mut self,
        unit: &mut SndScarlett2,
        elem_id: &ElemId,
        elem_value: &mut ElemValue,
    ) -> Result<bool, Error> {
        self.meter_ctl.read(unit, elem_id, elem_value)
    }
}

/// Per-model dispatch keyed by the product identifier in USB.
pub enum ScarlettModel {
    S6i6Gen2(ScarlettCtlModel<Scarlett6i6Gen2Protocol>),
    S18i8Gen2(ScarlettCtlModel<Scarlett18i8Gen2Protocol>),
    S18i20Gen2(ScarlettCtlModel<Scarlett18i20Gen2Protocol>),
    SoloGen3(ScarlettCtlModel<ScarlettSoloGen3Protocol>),
    S2i2Gen3(ScarlettCtlModel<Scarlett2i2Gen3Protocol>),
    S4i4Gen3(ScarlettCtlModel<Scarlett4i4Gen3Protocol>),
    S8i6Gen3(ScarlettCtlModel<Scarlett8i6Gen3Protocol>),
    S18i8Gen3(ScarlettCtlModel<Scarlett18i8Gen3Protocol>),
    S18i20Gen3(ScarlettCtlModel<Scarlett18i20Gen3Protocol>),
}

impl ScarlettModel {
    pub const SUPPORTED_PRODUCT_IDS: [u16; 9] = [
        Scarlett6i6Gen2Protocol::PRODUCT_ID,
        Scarlett18i8Gen2Protocol::PRODUCT_ID,
        Scarlett18i20Gen2Protocol::PRODUCT_ID,
        ScarlettSoloGen3Protocol::PRODUCT_ID,
        Scarlett2i2Gen3Protocol::PRODUCT_ID,
        Scarlett4i4Gen3Protocol::PRODUCT_ID,
        Scarlett8i6Gen3Protocol::PRODUCT_ID,
        Scarlett18i8Gen3Protocol::PRODUCT_ID,
        Scarlett18i20Gen3Protocol::PRODUCT_ID,
    ];

    pub fn new(
        product_id: u16,
        flags: &Arc<NotificationFlags>,
        save: SaveHandle,
        setup: u32,
    ) -> Result<Self, Error> {
        let model = match product_id {
            Scarlett6i6Gen2Protocol::PRODUCT_ID => {
                Self::S6i6Gen2(ScarlettCtlModel::new(flags, save, setup))
            }
            Scarlett18i8Gen2Protocol::PRODUCT_ID => {
                Self::S18i8Gen2(ScarlettCtlModel::new(flags, save, setup))
            }
            Scarlett18i20Gen2Protocol::PRODUCT_ID => {
                Self::S18i20Gen2(ScarlettCtlModel::new(flags, save, setup))
            }
            ScarlettSoloGen3Protocol::PRODUCT_ID => {
                Self::SoloGen3(ScarlettCtlModel::new(flags, save, setup))
            }
            Scarlett2i2Gen3Protocol::PRODUCT_ID => {
                Self::S2i2Gen3(ScarlettCtlModel::new(flags, save, setup))
            }
            Scarlett4i4Gen3Protocol::PRODUCT_ID => {
                Self::S4i4Gen3(ScarlettCtlModel::new(flags, save, setup))
            }
            Scarlett8i6Gen3Protocol::PRODUCT_ID => {
                Self::S8i6Gen3(ScarlettCtlModel::new(flags, save, setup))
            }
            Scarlett18i8Gen3Protocol::PRODUCT_ID => {
                Self::S18i8Gen3(ScarlettCtlModel::new(flags, save, setup))
            }
            Scarlett18i20Gen3Protocol::PRODUCT_ID => {
                Self::S18i20Gen3(ScarlettCtlModel::new(flags, save, setup))
            }
            _ => Err(Error::new(
                Scarlett2ControlError::NotSupported,
                "not supported",
            ))?,
        };
        Ok(model)
    }

    pub fn cache(&mut self, unit: &mut SndScarlett2) -> Result<(), Error> {
        match self {
            Self::S6i6Gen2(m) => m.cache(unit),
            Self::S18i8Gen2(m) => m.cache(unit),
            Self::S18i20Gen2(m) => m.cache(unit),
            Self::SoloGen3(m) => m.cache(unit),
            Self::S2i2Gen3(m) => m.cache(unit),
            Self::S4i4Gen3(m) => m.cache(unit),
            Self::S8i6Gen3(m) => m.cache(unit),
            Self::S18i8Gen3(m) => m.cache(unit),
            Self::S18i20Gen3(m) => m.cache(unit),
        }
    }

    pub fn load(&mut self, card_cntr: &mut CardCntr) -> Result<(), Error> {
        match self {
            Self::S6i6Gen2(m) => m.load(card_cntr),
            Self::S18i8Gen2(m) => m.load(card_cntr),
            Self::S18i20Gen2(m) => m.load(card_cntr),
            Self::SoloGen3(m) => m.load(card_cntr),
            Self::S2i2Gen3(m) => m.load(card_cntr),
            Self::S4i4Gen3(m) => m.load(card_cntr),
            Self::S8i6Gen3(m) => m.load(card_cntr),
            Self::S18i8Gen3(m) => m.load(card_cntr),
            Self::S18i20Gen3(m) => m.load(card_cntr),
        }
    }

    pub fn read(
        &mut self,
        unit: &mut SndScarlett2,
        elem_id: &ElemId,
        elem_value: &mut ElemValue,
    ) -> Result<bool, Error> {
        match self {
            Self::S6i6Gen2(m) => m.read(unit, elem_id, elem_value),
            Self::S18i8Gen2(m) => m.read(unit, elem_id, elem_value),
            Self::S18i20Gen2(m) => m.read(unit, elem_id, elem_value),
            Self::SoloGen3(m) => m.read(unit, elem_id, elem_value),
            Self::S2i2Gen3(m) => m.read(unit, elem_id, elem_value),
            Self::S4i4Gen3(m) => m.read(unit, elem_id, elem_value),
            Self::S8i6Gen3(m) => m.read(unit, elem_id, elem_value),
            Self::S18i8Gen3(m) => m.read(unit, elem_id, elem_value),
            Self::S18i20Gen3(m) => m.read(unit, elem_id, elem_value),
        }
    }

    fn apply_surface_changes(
        unit: &mut SndScarlett2,
        card_cntr: &mut CardCntr,
        model: &mut (impl CtlModel<SndScarlett2>
              + NotifyModel<SndScarlett2, u32>),
        access_changes: Vec<(ElemId, bool)>,
        value_changes: Vec<ElemId>,
    ) -> Result<(), Error> {
        access_changes
            .iter()
            .for_each(|(elem_id, writable)| card_cntr.set_elem_writable(elem_id, *writable));

        value_changes.iter().try_for_each(|elem_id| {
            let mut elem_value = ElemValue::new();
            if model.read(unit, elem_id, &mut elem_value)? {
                card_cntr.announce_elem_value(elem_id, &elem_value);
            }
            Ok(())
        })
    }

    pub fn dispatch_elem_event(
        &mut self,
        unit: &mut SndScarlett2,
        card_cntr: &mut CardCntr,
        elem_id: &ElemId,
        elem_value: &ElemValue,
    ) -> Result<(), Error> {
        match self {
            Self::S6i6Gen2(m) => {
                card_cntr.dispatch_elem_event(unit, elem_id, elem_value, m)?;
                let (access, values) = (m.drain_access_changes(), m.drain_value_changes());
                Self::apply_surface_changes(unit, card_cntr, m, access, values)
            }
            Self::S18i8Gen2(m) => {
                card_cntr.dispatch_elem_event(unit, elem_id, elem_value, m)?;
                let (access, values) = (m.drain_access_changes(), m.drain_value_changes());
                Self::apply_surface_changes(unit, card_cntr, m, access, values)
            }
            Self::S18i20Gen2(m) => {
                card_cntr.dispatch_elem_event(unit, elem_id, elem_value, m)?;
                let (access, values) = (m.drain_access_changes(), m.drain_value_changes());
                Self::apply_surface_changes(unit, card_cntr, m, access, values)
            }
            Self::SoloGen3(m) => {
                card_cntr.dispatch_elem_event(unit, elem_id, elem_value, m)?;
                let (access, values) = (m.drain_access_changes(), m.drain_value_changes());
                Self::apply_surface_changes(unit, card_cntr, m, access, values)
            }
            Self::S2i2Gen3(m) => {
                card_cntr.dispatch_elem_event(unit, elem_id, elem_value, m)?;
                let (access, values) = (m.drain_access_changes(), m.drain_value_changes());
                Self::apply_surface_changes(unit, card_cntr, m, access, values)
            }
            Self::S4i4Gen3(m) => {
                card_cntr.dispatch_elem_event(unit, elem_id, elem_value, m)?;
                let (access, values) = (m.drain_access_changes(), m.drain_value_changes());
                Self::apply_surface_changes(unit, card_cntr, m, access, values)
            }
            Self::S8i6Gen3(m) => {
                card_cntr.dispatch_elem_event(unit, elem_id, elem_value, m)?;
                let (access, values) = (m.drain_access_changes(), m.drain_value_changes());
                Self::apply_surface_changes(unit, card_cntr, m, access, values)
            }
            Self::S18i8Gen3(m) => {
                card_cntr.dispatch_elem_event(unit, elem_id, elem_value, m)?;
                let (access, values) = (m.drain_access_changes(), m.drain_value_changes());
                Self::apply_surface_changes(unit, card_cntr, m, access, values)
            }
            Self::S18i20Gen3(m) => {
                card_cntr.dispatch_elem_event(unit, elem_id, elem_value, m)?;
                let (access, values) = (m.drain_access_changes(), m.drain_value_changes());
                Self::apply_surface_changes(unit, card_cntr, m, access, values)
            }
        }
    }

    pub fn dispatch_notification(
        &mut self,
        unit: &mut SndScarlett2,
        card_cntr: &mut CardCntr,
        mask: u32,
    ) -> Result<(), Error> {
        match self {
            Self::S6i6Gen2(m) => {
                let mut elem_id_list = Vec::new();
                m.get_notified_elem_list(&mut elem_id_list);
                card_cntr.dispatch_notification(unit, &mask, &elem_id_list, m)
            }
            Self::S18i8Gen2(m) => {
                let mut elem_id_list = Vec::new();
                m.get_notified_elem_list(&mut elem_id_list);
                card_cntr.dispatch_notification(unit, &mask, &elem_id_list, m)
            }
            Self::S18i20Gen2(m) => {
                let mut elem_id_list = Vec::new();
                m.get_notified_elem_list(&mut elem_id_list);
                card_cntr.dispatch_notification(unit, &mask, &elem_id_list, m)
            }
            Self::SoloGen3(m) => {
                let mut elem_id_list = Vec::new();
                m.get_notified_elem_list(&mut elem_id_list);
                card_cntr.dispatch_notification(unit, &mask, &elem_id_list, m)
            }
            Self::S2i2Gen3(m) => {
                let mut elem_id_list = Vec::new();
                m.get_notified_elem_list(&mut elem_id_list);
                card_cntr.dispatch_notification(unit, &mask, &elem_id_list, m)
            }
            Self::S4i4Gen3(m) => {
                let mut elem_id_list = Vec::new();
                m.get_notified_elem_list(&mut elem_id_list);
                card_cntr.dispatch_notification(unit, &mask, &elem_id_list, m)
            }
            Self::S8i6Gen3(m) => {
                let mut elem_id_list = Vec::new();
                m.get_notified_elem_list(&mut elem_id_list);
                card_cntr.dispatch_notification(unit, &mask, &elem_id_list, m)
            }
            Self::S18i8Gen3(m) => {
                let mut elem_id_list = Vec::new();
                m.get_notified_elem_list(&mut elem_id_list);
                card_cntr.dispatch_notification(unit, &mask, &elem_id_list, m)
            }
            Self::S18i20Gen3(m) => {
                let mut elem_id_list = Vec::new();
                m.get_notified_elem_list(&mut elem_id_list);
                card_cntr.dispatch_notification(unit, &mask, &elem_id_list, m)
            }
        }
    }

    pub fn measure_elems(
        &mut self,
        unit: &mut SndScarlett2,
        card_cntr: &mut CardCntr,
    ) -> Result<(), Error> {
        match self {
            Self::S6i6Gen2(m) => {
                let mut elem_id_list = Vec::new();
                m.get_measure_elem_list(&mut elem_id_list);
                card_cntr.measure_elems(unit, &elem_id_list, m)
            }
            Self::S18i8Gen2(m) => {
                let mut elem_id_list = Vec::new();
                m.get_measure_elem_list(&mut elem_id_list);
                card_cntr.measure_elems(unit, &elem_id_list, m)
            }
            Self::S18i20Gen2(m) => {
                let mut elem_id_list = Vec::new();
                m.get_measure_elem_list(&mut elem_id_list);
                card_cntr.measure_elems(unit, &elem_id_list, m)
            }
            Self::SoloGen3(m) => {
                let mut elem_id_list = Vec::new();
                m.get_measure_elem_list(&mut elem_id_list);
                card_cntr.measure_elems(unit, &elem_id_list, m)
            }
            Self::S2i2Gen3(m) => {
                let mut elem_id_list = Vec::new();
                m.get_measure_elem_list(&mut elem_id_list);
                card_cntr.measure_elems(unit, &elem_id_list, m)
            }
            Self::S4i4Gen3(m) => {
                let mut elem_id_list = Vec::new();
                m.get_measure_elem_list(&mut elem_id_list);
                card_cntr.measure_elems(unit, &elem_id_list, m)
            }
            Self::S8i6Gen3(m) => {
                let mut elem_id_list = Vec::new();
                m.get_measure_elem_list(&mut elem_id_list);
                card_cntr.measure_elems(unit, &elem_id_list, m)
            }
            Self::S18i8Gen3(m) => {
                let mut elem_id_list = Vec::new();
                m.get_measure_elem_list(&mut elem_id_list);
                card_cntr.measure_elems(unit, &elem_id_list, m)
            }
            Self::S18i20Gen3(m) => {
                let mut elem_id_list = Vec::new();
                m.get_measure_elem_list(&mut elem_id_list);
                card_cntr.measure_elems(unit, &elem_id_list, m)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use {super::super::transport::test::test_unit, super::*, std::sync::mpsc};

    fn test_model<T: Scarlett2HardwareSpecification>(
    ) -> (ScarlettCtlModel<T>, SaveScheduler, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::sync_channel(32);
        let scheduler = SaveScheduler::run(tx);
        let flags = Arc::new(NotificationFlags::default());
        let model = ScarlettCtlModel::<T>::new(&flags, scheduler.handle(), DEVICE_SETUP_ENABLE);
        (model, scheduler, rx)
    }

    #[test]
    fn volume_write_reaches_the_wire() {
        let (mut model, _scheduler, _rx) = test_model::<Scarlett18i20Gen2Protocol>();
        let (mut unit, log) = test_unit();
        let mut card_cntr = CardCntr::default();

        // Force the mirror into a known state without hardware traffic.
        model.output_ctl.params.vols[0] = 127;
        model.flags.clear_vol();
        model.output_ctl.load(&mut card_cntr, false).unwrap();

        let elem_id = ElemId::new_by_name(
            ElemIfaceType::Mixer,
            "Line 01 (Monitor L) Playback Volume",
            0,
        );
        let mut elem_value = ElemValue::new();
        elem_value.set_int(&[100]);

        log.lock().unwrap().responses.push(Vec::new());
        log.lock().unwrap().responses.push(Vec::new());
        let handled = model
            .output_ctl
            .write(&mut unit, &mut None, &model.save.clone(), &elem_id, &elem_value)
            .unwrap();
        assert!(handled);
        assert_eq!(model.output_ctl.params.vols[0], 100);

        let log = log.lock().unwrap();
        // SET_DATA at 0x34 with the biased value, then the activation.
        let frame = &log.requests[0];
        assert_eq!(&frame[..4], &CMD_SET_DATA.to_le_bytes());
        assert_eq!(&frame[16..20], &0x34u32.to_le_bytes());
        assert_eq!(&frame[24..26], &[0xe5, 0xff]);
        let frame = &log.requests[1];
        assert_eq!(&frame[..4], &CMD_DATA_CMD.to_le_bytes());
        assert_eq!(&frame[16..20], &1u32.to_le_bytes());

        // The mutation armed the deferred save.
        assert!(model.save.cancel());
    }

    #[test]
    fn access_mode_round_trip_restores_software_volume() {
        let (mut model, _scheduler, _rx) = test_model::<Scarlett18i20Gen2Protocol>();
        let (mut unit, log) = test_unit();
        let mut card_cntr = CardCntr::default();

        let mut cfg = Scarlett2SoftwareConfig::new_default();
        cfg.set_volume(0, -27);
        model.sw_cfg = Some(cfg);
        model.output_ctl.params.vols[0] = 100;
        model.output_ctl.params.master_vol = 115;
        model.flags.clear_vol();
        model.output_ctl.load(&mut card_cntr, true).unwrap();

        let elem_id = ElemId::new_by_name(
            ElemIfaceType::Mixer,
            "Line Out 01 Volume Control Playback Enum",
            0,
        );

        // To hardware control; the fader becomes read-only.
        // The refresh at the end of the flip reads the volume status image back.
        let mut status_image = vec![0u8; 0x100];
        status_image[0x66] = 1;
        status_image[0x76..0x78].copy_from_slice(&(-12i16).to_le_bytes());
        {
            let mut log = log.lock().unwrap();
            (0..4).for_each(|_| log.responses.push(Vec::new()));
            log.responses.push(status_image.clone());
        }
        let mut elem_value = ElemValue::new();
        elem_value.set_enum(&[1]);
        let save = model.save.clone();
        model
            .output_ctl
            .write(&mut unit, &mut model.sw_cfg, &save, &elem_id, &elem_value)
            .unwrap();

        assert!(model.output_ctl.params.vol_sw_hw_switches[0]);
        assert_eq!(model.output_ctl.params.vols[0], 115);
        let access = model.output_ctl.drain_access_changes();
        assert_eq!(access.len(), 1);
        assert!(!access[0].1);

        // Back to software control; the stored volume returns.
        {
            let mut log = log.lock().unwrap();
            log.responses.clear();
            (0..4).for_each(|_| log.responses.push(Vec::new()));
            log.responses.push(vec![0u8; 0x100]);
        }
        let mut elem_value = ElemValue::new();
        elem_value.set_enum(&[0]);
        model
            .output_ctl
            .write(&mut unit, &mut model.sw_cfg, &save, &elem_id, &elem_value)
            .unwrap();

        assert!(!model.output_ctl.params.vol_sw_hw_switches[0]);
        assert_eq!(model.output_ctl.params.vols[0], 100);
        let access = model.output_ctl.drain_access_changes();
        assert_eq!(access.len(), 1);
        assert!(access[0].1);
    }
}
