mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    use embassy_futures::select::{Either, select};
    use embassy_time::Timer;
    use myrtio_pov::{
        ColorDataStore, Duration, Error, LoopControl, LoopState, Tick, TransmissionConfig,
        TransmissionLoop, TransmitPolicy, Transport,
    };

    const SIZE: usize = 4;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Init,
        Begin,
        Write(Vec<u8>),
        End,
        Teardown,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    enum Failure {
        #[default]
        None,
        Init,
        Write,
        Short,
        Signal,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<Event>>>,
        failure: Arc<Mutex<Failure>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        fn writes(&self) -> Vec<Vec<u8>> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    Event::Write(data) => Some(data),
                    _ => None,
                })
                .collect()
        }

        fn fail(&self, failure: Failure) {
            *self.failure.lock().unwrap() = failure;
        }

        fn push(&self, event: Event) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl Transport for Recorder {
        type Error = &'static str;

        fn init(&mut self) -> Result<(), Self::Error> {
            if *self.failure.lock().unwrap() == Failure::Init {
                return Err("no bus");
            }
            self.push(Event::Init);
            Ok(())
        }

        fn teardown(&mut self) {
            self.push(Event::Teardown);
        }

        fn begin_frame(&mut self) -> Result<(), Self::Error> {
            self.push(Event::Begin);
            if *self.failure.lock().unwrap() == Failure::Signal {
                return Err("frame pin stuck");
            }
            Ok(())
        }

        fn end_frame(&mut self) -> Result<(), Self::Error> {
            self.push(Event::End);
            Ok(())
        }

        fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
            match *self.failure.lock().unwrap() {
                Failure::Write => return Err("bus error"),
                Failure::Short => return Ok(data.len() - 1),
                _ => {}
            }
            self.push(Event::Write(data.to_vec()));
            Ok(data.len())
        }
    }

    fn config(policy: TransmitPolicy) -> TransmissionConfig {
        TransmissionConfig {
            frame_interval: Duration::from_millis(5),
            policy,
        }
    }

    #[test]
    fn test_first_frame_then_only_changes() {
        let store = ColorDataStore::<SIZE>::new();
        let control = LoopControl::new();
        let recorder = Recorder::default();
        let mut transport = recorder.clone();
        let mut lp = TransmissionLoop::new(
            &mut transport,
            &store,
            &control,
            config(TransmitPolicy::OnChange),
        )
        .unwrap();

        assert_eq!(lp.tick(), Tick::Sent);
        assert_eq!(lp.tick(), Tick::Unchanged);
        assert_eq!(lp.tick(), Tick::Unchanged);

        store.set(&[1, 2], 1).unwrap();
        store.set(&[9], 3).unwrap();
        assert_eq!(lp.tick(), Tick::Sent);
        assert_eq!(lp.tick(), Tick::Unchanged);

        assert_eq!(
            recorder.events(),
            vec![
                Event::Init,
                Event::Begin,
                Event::Write(vec![0, 0, 0, 0]),
                Event::End,
                Event::Begin,
                Event::Write(vec![0, 1, 2, 9]),
                Event::End,
            ]
        );
        let status = control.status();
        assert_eq!(status.frames_sent, 2);
        assert_eq!(status.frames_skipped, 3);
        assert_eq!(status.state, LoopState::Running);
    }

    #[test]
    fn test_every_frame_policy_always_transmits() {
        let store = ColorDataStore::<SIZE>::new();
        let control = LoopControl::new();
        let recorder = Recorder::default();
        let mut transport = recorder.clone();
        let mut lp = TransmissionLoop::new(
            &mut transport,
            &store,
            &control,
            config(TransmitPolicy::EveryFrame),
        )
        .unwrap();

        for _ in 0..3 {
            assert_eq!(lp.tick(), Tick::Sent);
        }
        store.set(&[5; SIZE], 0).unwrap();
        assert_eq!(lp.tick(), Tick::Sent);

        let writes = recorder.writes();
        assert_eq!(writes.len(), 4);
        assert_eq!(writes[3], vec![5; SIZE]);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_write_failure_skips_frame_and_continues() {
        let store = ColorDataStore::<SIZE>::new();
        let control = LoopControl::new();
        let recorder = Recorder::default();
        let mut transport = recorder.clone();
        let mut lp = TransmissionLoop::new(
            &mut transport,
            &store,
            &control,
            config(TransmitPolicy::OnChange),
        )
        .unwrap();

        recorder.fail(Failure::Write);
        assert_eq!(lp.tick(), Tick::WriteFailed);
        assert_eq!(
            recorder.events(),
            vec![Event::Init, Event::Begin, Event::End]
        );

        recorder.fail(Failure::Short);
        store.set(&[1], 0).unwrap();
        assert_eq!(lp.tick(), Tick::WriteFailed);

        // The failed frame goes out on the next iteration without a new write
        recorder.fail(Failure::None);
        assert_eq!(lp.tick(), Tick::Sent);
        assert_eq!(lp.tick(), Tick::Unchanged);
        store.set(&[2], 0).unwrap();
        assert_eq!(lp.tick(), Tick::Sent);

        let status = control.status();
        assert_eq!(status.write_failures, 2);
        assert_eq!(status.frames_sent, 2);
        assert_eq!(
            recorder.writes(),
            vec![vec![1, 0, 0, 0], vec![2, 0, 0, 0]]
        );
    }

    #[test]
    fn test_init_failure_aborts_startup() {
        let store = ColorDataStore::<SIZE>::new();
        let control = LoopControl::new();
        let recorder = Recorder::default();
        recorder.fail(Failure::Init);

        let mut transport = recorder.clone();
        let result = TransmissionLoop::new(
            &mut transport,
            &store,
            &control,
            TransmissionConfig::default(),
        );
        assert!(matches!(result, Err(Error::TransportInit)));
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_stop_before_first_tick() {
        let store = ColorDataStore::<SIZE>::new();
        let control = LoopControl::new();
        let recorder = Recorder::default();
        let mut transport = recorder.clone();
        let mut lp = TransmissionLoop::new(
            &mut transport,
            &store,
            &control,
            TransmissionConfig::default(),
        )
        .unwrap();

        control.request_stop();
        assert_eq!(control.state(), LoopState::Stopping);
        assert_eq!(lp.tick(), Tick::Stopped);

        let status = lp.shutdown();
        assert_eq!(status.state, LoopState::Stopped);
        assert_eq!(status.frames_sent, 0);
        assert_eq!(recorder.events(), vec![Event::Init, Event::Teardown]);

        // Stopped is terminal
        control.request_stop();
        assert_eq!(control.state(), LoopState::Stopped);
    }

    #[test]
    fn test_run_stops_within_one_interval() {
        let store = ColorDataStore::<SIZE>::new();
        let control = LoopControl::new();
        let recorder = Recorder::default();
        let mut transport = recorder.clone();
        let lp = TransmissionLoop::new(
            &mut transport,
            &store,
            &control,
            config(TransmitPolicy::OnChange),
        )
        .unwrap();

        std::thread::scope(|scope| {
            let handle = scope.spawn(move || embassy_futures::block_on(lp.run()));

            let deadline = Instant::now() + std::time::Duration::from_secs(5);
            while control.status().frames_sent == 0 {
                assert!(Instant::now() < deadline, "loop never transmitted");
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            store.set(&[7; SIZE], 0).unwrap();
            while control.status().frames_sent < 2 {
                assert!(Instant::now() < deadline, "loop missed an update");
                std::thread::sleep(std::time::Duration::from_millis(1));
            }

            let stop_requested = Instant::now();
            control.request_stop();
            let status = handle.join().unwrap();
            assert_eq!(status.state, LoopState::Stopped);
            assert!(stop_requested.elapsed() < std::time::Duration::from_secs(1));
        });

        assert_eq!(control.state(), LoopState::Stopped);
        let events = recorder.events();
        assert_eq!(events.last(), Some(&Event::Teardown));
        assert_eq!(
            events.iter().filter(|e| matches!(e, Event::Teardown)).count(),
            1
        );
        assert_eq!(recorder.writes().last(), Some(&vec![7; SIZE]));

        let writes_after_stop = recorder.writes().len();
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(recorder.writes().len(), writes_after_stop);
    }

    #[test]
    fn test_frame_signal_failure_counts_as_failed_frame() {
        let store = ColorDataStore::<SIZE>::new();
        let control = LoopControl::new();
        let recorder = Recorder::default();
        let mut transport = recorder.clone();
        let mut lp = TransmissionLoop::new(
            &mut transport,
            &store,
            &control,
            config(TransmitPolicy::OnChange),
        )
        .unwrap();

        recorder.fail(Failure::Signal);
        assert_eq!(lp.tick(), Tick::WriteFailed);
        assert_eq!(
            recorder.events(),
            vec![Event::Init, Event::Begin, Event::End]
        );

        recorder.fail(Failure::None);
        assert_eq!(lp.tick(), Tick::Sent);
        assert_eq!(control.status().write_failures, 1);
        assert_eq!(control.status().frames_sent, 1);
    }

    #[test]
    fn test_dropped_loop_tears_down_once() {
        let store = ColorDataStore::<SIZE>::new();
        let control = LoopControl::new();
        let recorder = Recorder::default();
        let mut transport = recorder.clone();
        let mut lp = TransmissionLoop::new(
            &mut transport,
            &store,
            &control,
            TransmissionConfig::default(),
        )
        .unwrap();

        assert_eq!(lp.tick(), Tick::Sent);
        drop(lp);

        assert_eq!(control.state(), LoopState::Stopped);
        assert_eq!(recorder.events().last(), Some(&Event::Teardown));
        assert_eq!(
            recorder
                .events()
                .iter()
                .filter(|e| matches!(e, Event::Teardown))
                .count(),
            1
        );
    }

    #[test]
    fn test_cancelled_run_tears_down() {
        let store = ColorDataStore::<SIZE>::new();
        let control = LoopControl::new();
        let recorder = Recorder::default();
        let mut transport = recorder.clone();
        let lp = TransmissionLoop::new(
            &mut transport,
            &store,
            &control,
            config(TransmitPolicy::EveryFrame),
        )
        .unwrap();

        let outcome = embassy_futures::block_on(select(
            lp.run(),
            Timer::after(Duration::from_millis(30)),
        ));
        assert!(matches!(outcome, Either::Second(())));

        assert_eq!(control.state(), LoopState::Stopped);
        assert!(control.status().frames_sent >= 1);
        assert_eq!(recorder.events().last(), Some(&Event::Teardown));
    }
}
