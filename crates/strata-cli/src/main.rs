mod command;
mod postprocess;
mod schema;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
