use anyhow::Result;

fn main() -> Result<()> {
    specmap_cli::main_entry()
}
