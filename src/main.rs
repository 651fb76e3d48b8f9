//! Binary entry point. All CLI logic is in the `cli` module.

fn main() {
    gitscope::cli::run();
}
