use skein::LayoutOptions;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Parse(skein_graph::ParseError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Parse(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<skein_graph::ParseError> for CliError {
    fn from(value: skein_graph::ParseError) -> Self {
        Self::Parse(value)
    }
}

const USAGE: &str = "usage: skein-cli [PATH]

Reads a graph description from PATH (or standard input), computes initial node
positions, and writes the annotated description back to PATH (or standard
output).";

#[derive(Debug, Default)]
struct Args {
    path: Option<String>,
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    for arg in &argv[1..] {
        if arg.starts_with('-') && arg != "-" {
            return Err(CliError::Usage(USAGE));
        }
        if args.path.is_some() {
            return Err(CliError::Usage(USAGE));
        }
        args.path = Some(arg.clone());
    }
    Ok(args)
}

fn run(args: &Args) -> Result<(), CliError> {
    let text = match args.path.as_deref() {
        Some(path) if path != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut g = skein_graph::parse(&text)?;
    skein::solve_positions(&mut g, &LayoutOptions::default());
    let out = skein_graph::write(&g);

    match args.path.as_deref() {
        Some(path) if path != "-" => std::fs::write(path, out)?,
        _ => {
            use std::io::Write;
            std::io::stdout().lock().write_all(out.as_bytes())?;
        }
    }
    Ok(())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
