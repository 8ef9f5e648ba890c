//! Sysfs GPIO driver
//!
//! Drives header pins through the legacy `/sys/class/gpio` interface: the
//! kernel line from the board's pin table is exported, then its `direction`,
//! `value` and `edge` attributes are used directly.
//!
//! Once `edge` is written the kernel latches every matching transition and
//! flags the open `value` file with `POLLPRI`. A watcher thread blocks in
//! poll(2) on that file and runs the handler once per wakeup. It is stopped
//! through one end of a socket pair. A board can take over interrupt setup
//! through its advanced hooks.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::os::fd::{AsFd, BorrowedFd};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error, warn};
use mraa_hal::board::Board;
use mraa_hal::gpio::{Direction, Edge, GpioPin, InterruptPin, IsrHandler, Level};
use mraa_hal::hooks::AdvancedHooks;
use mraa_hal::pin::PinCapabilities;
use mraa_hal::{Error, Result};
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

use super::sysfs::{read_attr, write_attr};
use crate::config::PlatformConfig;

/// Sysfs GPIO class directory
pub const SYSFS_CLASS_GPIO: &str = "/sys/class/gpio";

/// Descriptor the watcher blocks on until an edge is latched
pub(crate) trait EdgeSource: Send + 'static {
    /// File that becomes ready on an edge
    fn fd(&self) -> BorrowedFd<'_>;

    /// Readiness flags that mean an edge is pending
    fn events(&self) -> PollFlags;

    /// Consume the pending edge so the next poll blocks again
    fn acknowledge(&mut self) -> io::Result<()>;
}

/// Open `value` attribute of an exported line
struct SysfsEdges {
    value: File,
    scratch: String,
}

impl SysfsEdges {
    fn open(path: &Path) -> io::Result<Self> {
        let mut edges = Self {
            value: File::open(path)?,
            scratch: String::new(),
        };
        // Clear the state latched before the edge was configured
        edges.acknowledge()?;
        Ok(edges)
    }
}

impl EdgeSource for SysfsEdges {
    fn fd(&self) -> BorrowedFd<'_> {
        self.value.as_fd()
    }

    fn events(&self) -> PollFlags {
        PollFlags::POLLPRI | PollFlags::POLLERR
    }

    fn acknowledge(&mut self) -> io::Result<()> {
        self.value.seek(SeekFrom::Start(0))?;
        self.scratch.clear();
        self.value.read_to_string(&mut self.scratch)?;
        Ok(())
    }
}

struct IsrWatcher {
    stop: UnixStream,
    thread: JoinHandle<io::Result<()>>,
}

impl IsrWatcher {
    fn spawn<S: EdgeSource>(line: u32, source: S, handler: IsrHandler) -> io::Result<Self> {
        let (stop, wake) = UnixStream::pair()?;
        let thread = thread::Builder::new()
            .name(format!("gpio{line}-isr"))
            .spawn(move || {
                let result = watch(source, &wake, handler);
                if let Err(err) = &result {
                    error!("gpio: line {} interrupt watcher stopped: {}", line, err);
                }
                result
            })?;
        Ok(Self { stop, thread })
    }

    fn is_running(&self) -> bool {
        !self.thread.is_finished()
    }

    fn stop(mut self, line: u32) -> Result<()> {
        // A watcher that already exited has closed its end
        if let Err(err) = self.stop.write_all(&[1]) {
            debug!("gpio: line {} watcher already gone: {}", line, err);
        }
        match self.thread.join() {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!("gpio: line {} interrupt handler panicked", line);
                Ok(())
            }
        }
    }
}

fn watch<S: EdgeSource>(
    mut source: S,
    wake: &UnixStream,
    mut handler: IsrHandler,
) -> io::Result<()> {
    loop {
        let (edge, stopped) = {
            let events = source.events();
            let mut fds = [
                PollFd::new(source.fd(), events),
                PollFd::new(wake.as_fd(), PollFlags::POLLIN),
            ];
            match poll(&mut fds, PollTimeout::NONE) {
                Ok(_) => {}
                Err(Errno::EINTR) => continue,
                Err(errno) => return Err(errno.into()),
            }
            let ready = |fd: &PollFd| fd.revents().unwrap_or(PollFlags::empty());
            (ready(&fds[0]).intersects(events), !ready(&fds[1]).is_empty())
        };

        if stopped {
            return Ok(());
        }
        if edge {
            source.acknowledge()?;
            handler();
        }
    }
}

enum IsrState {
    Watcher(IsrWatcher),
    Replaced,
}

/// GPIO pin driven through sysfs
pub struct SysfsGpio {
    pin: usize,
    line: u32,
    class: PathBuf,
    dir: PathBuf,
    owner: bool,
    released: bool,
    hooks: Arc<dyn AdvancedHooks>,
    isr: Option<IsrState>,
}

impl SysfsGpio {
    /// Open board pin `pin` as a GPIO
    ///
    /// The pin must be GPIO capable and mapped to a kernel line. The line is
    /// exported unless it already is; only a handle that exported the line
    /// unexports it again.
    pub fn open(board: &Board, pin: usize, config: &PlatformConfig) -> Result<Self> {
        let info = board.pin(pin).ok_or_else(|| {
            error!("gpio: pin {} out of range on {}", pin, board.platform_name);
            Error::InvalidResource
        })?;
        let line = match info.gpio_line() {
            Some(line) if info.capabilities.contains(PinCapabilities::GPIO) => line,
            _ => {
                error!("gpio: pin {} ({}) is not GPIO capable", pin, info.name());
                return Err(Error::InvalidResource);
            }
        };

        let hooks = board.hooks();
        hooks.gpio_init_pre(pin)?;

        let class = config.path(SYSFS_CLASS_GPIO);
        let dir = class.join(format!("gpio{line}"));
        let owner = !dir.is_dir();
        if owner {
            if let Err(err) = write_attr(&class.join("export"), line) {
                error!("gpio: exporting line {} failed: {}", line, err);
                if let Err(undo) = hooks.gpio_close_pre(pin) {
                    warn!("gpio: pin {} close hook failed: {}", pin, undo);
                }
                return Err(err.into());
            }
        } else {
            debug!("gpio: line {} already exported", line);
        }

        Ok(Self {
            pin,
            line,
            class,
            dir,
            owner,
            released: false,
            hooks,
            isr: None,
        })
    }

    /// Release the line, reporting any failure
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn attr(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub(crate) fn start_isr<S: EdgeSource>(
        &mut self,
        edge: Edge,
        handler: IsrHandler,
        source: impl FnOnce(&Path) -> io::Result<S>,
    ) -> Result<()> {
        if self.isr.is_some() {
            return Err(Error::Busy);
        }
        if edge == Edge::None {
            return Err(Error::InvalidParameter);
        }
        if self.hooks.overrides_gpio_isr() {
            self.hooks.gpio_isr_replace(self.pin, edge, handler)?;
            self.isr = Some(IsrState::Replaced);
            return Ok(());
        }

        self.set_edge(edge)?;
        let watcher = source(&self.attr("value"))
            .and_then(|source| IsrWatcher::spawn(self.line, source, handler));
        match watcher {
            Ok(watcher) => {
                debug!("gpio: line {} interrupt on {:?} edge", self.line, edge);
                self.isr = Some(IsrState::Watcher(watcher));
                Ok(())
            }
            Err(err) => {
                self.set_edge(Edge::None)?;
                Err(err.into())
            }
        }
    }

    fn stop_isr(&mut self) -> Result<()> {
        match self.isr.take() {
            None => Ok(()),
            Some(IsrState::Replaced) => self.hooks.gpio_isr_exit_replace(self.pin),
            Some(IsrState::Watcher(watcher)) => {
                let result = watcher.stop(self.line);
                self.set_edge(Edge::None)?;
                result
            }
        }
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        let isr = self.stop_isr();
        let hook = self.hooks.gpio_close_pre(self.pin);
        if self.owner {
            write_attr(&self.class.join("unexport"), self.line)?;
        }
        self.released = true;
        isr.and(hook)
    }
}

impl GpioPin for SysfsGpio {
    type Error = Error;

    fn pin_number(&self) -> usize {
        self.pin
    }

    fn line(&self) -> u32 {
        self.line
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        write_attr(&self.attr("direction"), direction.as_sysfs())?;
        Ok(())
    }

    fn direction(&self) -> Result<Direction> {
        let value = read_attr(&self.attr("direction"))?;
        Direction::from_sysfs(&value).ok_or(Error::InvalidParameter)
    }

    fn read(&self) -> Result<Level> {
        let value = read_attr(&self.attr("value"))?;
        Level::from_sysfs(&value).ok_or(Error::InvalidParameter)
    }

    fn write(&mut self, level: Level) -> Result<()> {
        write_attr(&self.attr("value"), level.as_sysfs())?;
        Ok(())
    }
}

impl InterruptPin for SysfsGpio {
    fn set_edge(&mut self, edge: Edge) -> Result<()> {
        write_attr(&self.attr("edge"), edge.as_sysfs())?;
        Ok(())
    }

    fn isr(&mut self, edge: Edge, handler: IsrHandler) -> Result<()> {
        self.start_isr(edge, handler, SysfsEdges::open)
    }

    fn isr_exit(&mut self) -> Result<()> {
        self.stop_isr()
    }

    fn has_isr(&self) -> bool {
        match &self.isr {
            Some(IsrState::Watcher(watcher)) => watcher.is_running(),
            Some(IsrState::Replaced) => true,
            None => false,
        }
    }
}

impl Drop for SysfsGpio {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("gpio: releasing line {} failed: {}", self.line, err);
        }
    }
}
