use std::process::ExitCode;

fn main() -> ExitCode {
    docqa_lib::run()
}
