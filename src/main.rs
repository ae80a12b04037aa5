fn main() -> anyhow::Result<()> {
    commit_browser::cli::run()
}
