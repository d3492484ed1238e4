use std::process;

fn main() {
    if let Err(e) = yata::cli::run() {
        yata::ui::print_error(&format!("{:#}", e));
        process::exit(1);
    }
}
