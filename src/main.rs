fn main() -> anyhow::Result<()> {
    cadenza::runtime::run()
}
