use anyhow::Result;

fn main() -> Result<()> {
    risk_cli::main_entry()
}
