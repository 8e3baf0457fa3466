use std::{
    io,
    mem::MaybeUninit,
    os::fd::{AsRawFd, RawFd},
};

/// Keeps the terminal in non-canonical, no-echo mode until dropped.
pub struct RawMode {
    fd: RawFd,
    original: libc::termios,
}

impl RawMode {
    pub fn enable(fd: &impl AsRawFd) -> io::Result<Self> {
        let fd = fd.as_raw_fd();
        let mut termios = MaybeUninit::uninit();

        let original = unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                return Err(io::Error::last_os_error());
            }

            termios.assume_init()
        };

        let mut termios = original;
        termios.c_lflag &= !(libc::ECHO | libc::ICANON);

        unsafe {
            if libc::tcsetattr(fd, libc::TCSADRAIN, &termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(Self { fd, original })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        unsafe {
            libc::tcsetattr(self.fd, libc::TCSADRAIN, &self.original);
        }
    }
}
