use std::io::{self, Write};

/// The line the ACS test program prints on every run.
pub const BANNER: &str = "Test ACS program successfully executing!";

pub fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", BANNER)?;
    out.flush()
}
