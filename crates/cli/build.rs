use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };
    let completions_dir = out_dir.join("completions");

    if let Err(e) = fs::create_dir_all(&completions_dir) {
        println!("cargo:warning=Could not create completions directory: {}", e);
        return;
    }

    let mut cmd = clap::Command::new("referent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract article text from web pages")
        .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (text, json)")
                .value_name("FORMAT")
                .default_value("text")
                .value_parser(["text", "json"]),
        )
        .arg(
            clap::arg!(-t --task <TASK> "Generate an artifact from the article")
                .value_name("TASK")
                .value_parser(["summary", "thesis", "telegram", "translate", "illustration"]),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(
            clap::Arg::new("user_agent")
                .long("user-agent")
                .value_name("UA")
                .help("Custom User-Agent for HTTP requests"),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    for shell in [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ] {
        if let Err(e) = clap_complete::generate_to(shell, &mut cmd, "referent", &completions_dir) {
            println!("cargo:warning=Could not generate {} completions: {}", shell, e);
        }
    }
}
