use acs::banner;

fn main() {
    // Arguments and stdin are ignored. Exit status is 0 even if stdout is gone.
    let stdout = std::io::stdout();
    let _ = banner::write_banner(&mut stdout.lock());
}
