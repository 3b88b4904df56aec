use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{display::FrameBuffer, emulator::Machine, error::Result, timer::CycleTimer};

#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub cycles_per_second: Option<u32>,
    pub max_cycles: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Cancelled,
    CycleLimit,
}

// checked once per cycle
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// return false to stop the run
pub trait Frontend {
    fn sync(&mut self, fb: &FrameBuffer) -> bool;
}

pub struct Headless;

impl Frontend for Headless {
    fn sync(&mut self, _fb: &FrameBuffer) -> bool {
        true
    }
}

pub struct Runner {
    config: RunConfig,
    cancel: CancelToken,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    // only returns on a machine error unless cancelled or given a budget
    pub fn run(&mut self, machine: &mut Machine) -> Result<Exit> {
        self.run_with(machine, &mut Headless)
    }

    pub fn run_with<F: Frontend + ?Sized>(
        &mut self,
        machine: &mut Machine,
        frontend: &mut F,
    ) -> Result<Exit> {
        let mut timer = self.config.cycles_per_second.map(CycleTimer::new);
        if let Some(timer) = &timer {
            log::debug!("one instruction every {:?}", timer.period());
        }

        loop {
            if self.cancel.is_cancelled() {
                log::info!("cancelled after {} cycles", machine.cycles());
                return Ok(Exit::Cancelled);
            }
            if self
                .config
                .max_cycles
                .is_some_and(|max| machine.cycles() >= max)
            {
                log::info!("cycle budget of {} reached", machine.cycles());
                return Ok(Exit::CycleLimit);
            }
            if let Some(timer) = timer.as_mut() {
                timer.wait();
            }

            let pc = machine.pc();
            if let Err(err) = machine.step() {
                log::error!(
                    "halted at {pc:#05x} after {} cycles: {err}",
                    machine.cycles()
                );
                return Err(err);
            }

            if !frontend.sync(machine.frame_buffer()) {
                self.cancel.cancel();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::error::MachineError;

    fn image(words: &[u16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    struct CountingFrontend {
        syncs: usize,
        stop_after: usize,
    }

    impl Frontend for CountingFrontend {
        fn sync(&mut self, _fb: &FrameBuffer) -> bool {
            self.syncs += 1;
            self.syncs < self.stop_after
        }
    }

    #[test]
    fn runs_until_machine_error() {
        let mut machine = Machine::new(&image(&[0x6005, 0x7003, 0x00E0])).unwrap();
        let result = Runner::new(RunConfig::default()).run(&mut machine);
        assert_eq!(result, Err(MachineError::UnimplementedOpcode(0x00E0)));
        assert_eq!(machine.cycles(), 2);
        assert_eq!(machine.registers().get(0), 8);
        assert_eq!(machine.pc(), 0x204);
    }

    #[test]
    fn honours_cycle_budget() {
        let mut machine = Machine::new(&image(&[0x7001; 8])).unwrap();
        let config = RunConfig {
            max_cycles: Some(3),
            ..RunConfig::default()
        };
        assert_eq!(Runner::new(config).run(&mut machine), Ok(Exit::CycleLimit));
        assert_eq!(machine.registers().get(0), 3);
    }

    #[test]
    fn cancelled_before_start() {
        let mut machine = Machine::new(&image(&[0x7001])).unwrap();
        let mut runner = Runner::new(RunConfig::default());
        runner.cancel_token().cancel();
        assert_eq!(runner.run(&mut machine), Ok(Exit::Cancelled));
        assert_eq!(machine.cycles(), 0);
    }

    #[test]
    fn frontend_can_stop_the_run() {
        let mut machine = Machine::new(&image(&[0x7001; 8])).unwrap();
        let mut runner = Runner::new(RunConfig::default());
        let token = runner.cancel_token();
        let mut frontend = CountingFrontend {
            syncs: 0,
            stop_after: 4,
        };
        assert_eq!(
            runner.run_with(&mut machine, &mut frontend),
            Ok(Exit::Cancelled)
        );
        assert_eq!(frontend.syncs, 4);
        assert_eq!(machine.cycles(), 4);
        assert!(token.is_cancelled());
    }

    #[test]
    fn throttled_run() {
        let mut machine = Machine::new(&image(&[0x7001; 8])).unwrap();
        let config = RunConfig {
            cycles_per_second: Some(1000),
            max_cycles: Some(5),
        };
        let start = Instant::now();
        assert_eq!(Runner::new(config).run(&mut machine), Ok(Exit::CycleLimit));
        assert!(start.elapsed() >= Duration::from_millis(4));
    }
}
