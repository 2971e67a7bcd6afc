use std::time::Instant;

use crate::{
    error::{Fault, Result},
    host::Host,
    keyboard::Keyboard,
    machine::Machine,
    timer::{FramePacer, Pacing},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    /// terminal: a fault can't be recovered from
    Aborted(Fault),
}

/// Drives the machine one frame at a time against a host.
pub struct Emulator<H: Host> {
    pub machine: Machine,
    host: H,
    pacer: FramePacer,
    state: SchedulerState,
    frames: u64,
    frame_limit: Option<u64>,
}

impl<H: Host> Emulator<H> {
    pub fn new(machine: Machine, host: H, pacing: Pacing) -> Self {
        Self {
            machine,
            host,
            pacer: FramePacer::new(pacing),
            state: SchedulerState::Idle,
            frames: 0,
            frame_limit: None,
        }
    }

    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Frames that ran to completion.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Runs one frame with `keys` and hands its output to the host. Nothing
    /// is presented when the frame faults.
    pub fn run_frame(&mut self, keys: &Keyboard) -> Result<()> {
        if let SchedulerState::Aborted(fault) = self.state {
            return Err(fault.into());
        }

        self.state = SchedulerState::Running;
        if let Err(fault) = self.machine.run_frame(keys) {
            log::error!(
                "frame {} aborted after {} instructions: {fault}",
                self.frames,
                self.machine.executed()
            );
            self.state = SchedulerState::Aborted(fault);
            return Err(fault.into());
        }
        self.state = SchedulerState::Idle;

        self.host.present(self.machine.pixels())?;
        self.host.play_audio(self.machine.audio())?;
        self.frames += 1;
        Ok(())
    }

    /// The frame loop. Returns when the host stops, the frame limit is hit,
    /// or on the first error.
    pub fn run(&mut self) -> Result<()> {
        log::info!(
            "running at {:?} per frame ({:?} pacing)",
            self.pacer.pacing().period(),
            self.pacer.pacing()
        );
        loop {
            if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
                log::info!("frame limit reached after {} frames", self.frames);
                break;
            }
            self.pacer.start_frame(Instant::now());

            let input = self.host.poll_input()?;
            if !input.running {
                log::info!("host stopped after {} frames", self.frames);
                break;
            }

            self.run_frame(&input.keys)?;
            self.pacer.wait();
        }
        if self.pacer.overruns() > 0 {
            log::info!("{} frame(s) overran their period", self.pacer.overruns());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::{
        decode::Instruction,
        error::Error,
        host::Input,
        memory::{TypeAddr, AUDIO_BANK_ADDR, PC_ADDR, PIXEL_BANK_ADDR},
    };

    const SCRATCH: TypeAddr = 0x10_0000;

    /// Scripted keys in, recorded frames out. Stops when the script runs
    /// dry unless `endless`.
    #[derive(Default)]
    struct FakeHost {
        script: VecDeque<Keyboard>,
        endless: bool,
        fail_audio: bool,
        presented: Vec<Vec<u8>>,
        played: Vec<Vec<u8>>,
    }

    impl FakeHost {
        fn scripted(frames: impl IntoIterator<Item = Keyboard>) -> Self {
            Self {
                script: frames.into_iter().collect(),
                ..Self::default()
            }
        }
    }

    impl Host for FakeHost {
        fn poll_input(&mut self) -> Result<Input> {
            Ok(match self.script.pop_front() {
                Some(keys) => Input {
                    running: true,
                    keys,
                },
                None => Input {
                    running: self.endless,
                    keys: Keyboard::new(),
                },
            })
        }

        fn present(&mut self, pixels: &[u8]) -> Result<()> {
            self.presented.push(pixels.to_vec());
            Ok(())
        }

        fn play_audio(&mut self, samples: &[u8]) -> Result<()> {
            if self.fail_audio {
                return Err(Error::Audio("device went away".into()));
            }
            self.played.push(samples.to_vec());
            Ok(())
        }
    }

    fn write_ins(m: &mut Machine, at: TypeAddr, src: TypeAddr, dst: TypeAddr, next: TypeAddr) {
        m.write_program(at, &Instruction { src, dst, next }.encode());
    }

    /// Entry at 8: copy the low key byte to SCRATCH, then spin at 17.
    fn key_echo() -> Machine {
        let mut m = Machine::new();
        m.write_program(PC_ADDR, &[0, 0, 8]);
        write_ins(&mut m, 8, 1, SCRATCH, 17);
        write_ins(&mut m, 17, SCRATCH + 1, SCRATCH + 1, 17);
        m
    }

    fn key(n: u8) -> Keyboard {
        let mut kb = Keyboard::new();
        kb.press(n);
        kb
    }

    #[test]
    fn test_runs_until_host_stops() -> Result<()> {
        let host = FakeHost::scripted([Keyboard::new(); 3]);
        let mut emu = Emulator::new(key_echo(), host, Pacing::Unlimited);
        emu.run()?;
        assert_eq!(emu.frames(), 3);
        assert_eq!(emu.state(), SchedulerState::Idle);
        let host = emu.into_host();
        assert_eq!(host.presented.len(), 3);
        assert_eq!(host.played.len(), 3);
        assert!(host.presented.iter().all(|p| p.len() == 256 * 256));
        assert!(host.played.iter().all(|a| a.len() == 256));
        Ok(())
    }

    #[test]
    fn test_frame_limit() -> Result<()> {
        let host = FakeHost {
            endless: true,
            ..FakeHost::default()
        };
        let mut emu = Emulator::new(key_echo(), host, Pacing::Unlimited).with_frame_limit(4);
        emu.run()?;
        assert_eq!(emu.frames(), 4);
        assert_eq!(emu.host().presented.len(), 4);
        Ok(())
    }

    #[test]
    fn test_every_frame_reenters_at_header_pc() -> Result<()> {
        let mut emu = Emulator::new(key_echo(), FakeHost::default(), Pacing::Unlimited);
        emu.run_frame(&Keyboard::new())?;
        assert_eq!(emu.machine.mem.get(SCRATCH), 0);
        assert_eq!(emu.machine.pc.addr(), 17);
        emu.run_frame(&key(0xF))?;
        assert_eq!(emu.machine.mem.get(SCRATCH), 0x01);
        Ok(())
    }

    #[test]
    fn test_output_regions_reach_host() -> Result<()> {
        let mut m = Machine::new();
        m.mem.set(PIXEL_BANK_ADDR, 0x01);
        m.write_program(AUDIO_BANK_ADDR, &[0x03, 0x00]);
        m.mem.set(0x200, 0x2A);
        m.mem.set(0x201, 0x80);
        m.write_program(PC_ADDR, &[0, 0, 8]);
        // one pixel and one sample, then spin
        write_ins(&mut m, 8, 0x200, 0x01_0000 + 256 + 5, 17);
        write_ins(&mut m, 17, 0x201, 0x03_0000 + 255, 26);
        write_ins(&mut m, 26, SCRATCH, SCRATCH, 26);

        let mut emu = Emulator::new(m, FakeHost::default(), Pacing::Unlimited);
        emu.run_frame(&Keyboard::new())?;
        let host = emu.host();
        assert_eq!(host.presented[0][256 + 5], 0x2A);
        assert_eq!(host.presented[0].iter().filter(|&&p| p != 0).count(), 1);
        assert_eq!(host.played[0][255], 0x80);
        Ok(())
    }

    #[test]
    fn test_fault_aborts_without_output() {
        let mut m = Machine::new();
        m.write_program(PC_ADDR, &[0xFF, 0xFF, 0xFF]);
        let host = FakeHost::scripted([Keyboard::new(); 2]);
        let mut emu = Emulator::new(m, host, Pacing::Unlimited);

        let err = emu.run().unwrap_err();
        let fault = Fault::InvalidInstructionPointer { pc: 0xFF_FFFF };
        assert!(matches!(err, Error::Fault(f) if f == fault));
        assert_eq!(emu.state(), SchedulerState::Aborted(fault));
        assert_eq!(emu.frames(), 0);
        assert!(emu.host().presented.is_empty());
        assert!(emu.host().played.is_empty());

        // stays dead, even if the program got fixed underneath
        emu.machine.write_program(PC_ADDR, &[0, 0, 0]);
        assert!(matches!(emu.run_frame(&Keyboard::new()), Err(Error::Fault(f)) if f == fault));
    }

    #[test]
    fn test_program_can_fault_a_later_frame() {
        let mut m = Machine::new();
        m.write_program(PC_ADDR, &[0, 0, 8]);
        // copy the high key byte over the top two bytes of the entry point
        write_ins(&mut m, 8, 0, PC_ADDR, 17);
        write_ins(&mut m, 17, 0, PC_ADDR + 1, 26);
        write_ins(&mut m, 26, SCRATCH, SCRATCH, 26);
        // the new entry point runs once, then jumps off the end
        write_ins(&mut m, 0xFF_FF08, SCRATCH, SCRATCH, 0xFF_FFFF);

        let mut high = [false; 16];
        high[..8].fill(true);
        let script = [
            Keyboard::new(),
            Keyboard::new(),
            Keyboard::from_keys(high),
            Keyboard::new(),
            Keyboard::new(),
        ];
        let mut emu = Emulator::new(m, FakeHost::scripted(script), Pacing::Unlimited);
        let err = emu.run().unwrap_err();
        assert!(matches!(
            err,
            Error::Fault(Fault::InvalidInstructionPointer { pc: 0xFF_FFFF })
        ));
        assert_eq!(emu.frames(), 3);
        assert_eq!(emu.machine.executed(), 1);
        assert_eq!(emu.host().presented.len(), 3);
    }

    #[test]
    fn test_host_errors_end_the_run() {
        let host = FakeHost {
            endless: true,
            fail_audio: true,
            ..FakeHost::default()
        };
        let mut emu = Emulator::new(key_echo(), host, Pacing::Unlimited);
        assert!(matches!(emu.run(), Err(Error::Audio(_))));
        assert_eq!(emu.frames(), 0);
        assert_eq!(emu.host().presented.len(), 1);
    }
}
