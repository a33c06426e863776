use std::process;

fn main() {
    match markdown_merge_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("markdown-merge error: {err}");
            process::exit(1);
        }
    }
}
