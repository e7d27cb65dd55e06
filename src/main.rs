//! text-autolink: mark up references in comment text

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
