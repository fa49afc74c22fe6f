//! awscred binary entry point

fn main() -> anyhow::Result<()> {
    awscred::run()
}
