use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("nightly")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract trending repositories from the Changelog Nightly digest")
        .arg(clap::arg!(-d --date <DATE> "Digest day (YYYY-MM-DD, default: yesterday in UTC)"))
        .arg(clap::arg!(-i --input <FILE> "Read the digest from a local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout unless --publish)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--publish "Commit the JSON to GitHub"))
        .arg(clap::arg!(--"no-screenshots" "Skip README screenshot detection"))
        .arg(clap::arg!(--concurrency <NUM> "Maximum README requests in flight").default_value("4"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests"))
        .arg(clap::arg!(--pretty "Pretty-print the JSON output"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "nightly", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "nightly", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "nightly", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "nightly", &completions_dir).unwrap();
}
