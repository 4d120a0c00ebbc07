fn main() -> anyhow::Result<()> {
    loupebench::run()
}
