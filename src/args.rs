use std::path::PathBuf;
use std::fs::File;
use std::io::{ self, BufWriter, Write };
use tokio::sync::mpsc;
use clap::Parser;

pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 3.0;

#[derive(Parser, Clone, Debug)]
#[command(version, about = "Headless five-a-side match simulation", long_about = None)]
pub struct ArgConfig {
    /// JSON game config; missing fields use the defaults
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// directory holding optional <role>.json models
    #[arg(short = 'm', long = "models")]
    pub models: Option<PathBuf>,
    /// seed for kick-off randomness
    #[arg(long)]
    pub seed: Option<u64>,
    /// initial speed multiplier
    #[arg(long, default_value_t = 1.0, value_parser = parse_speed)]
    pub speed: f32,
    /// frames per second driving the simulation
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub fps: u32,
    /// stop after this many frames (runs until ctrl-c otherwise)
    #[arg(short = 't', long = "ticks")]
    pub ticks: Option<u64>,
    /// read pause/resume/reset/speed commands from stdin
    #[arg(long)]
    pub controls: bool,
    /// debug-level diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,
    /// output sources to print (e.g., -p g,e)
    #[arg(short = 'p', long = "print", value_delimiter = ',', value_parser = parse_source)]
    pub print: Option<Vec<OutputSource>>,
    /// output sources redirected to file, format: e:events.jsonl g,s:log.txt
    #[arg(short = 'o', long = "output", value_parser = parse_output_mappings)]
    pub output: Option<Vec<OutputMapping>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputSource {
    Gamelog,
    Events,
    Stats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMapping {
    pub sources: Vec<OutputSource>,
    pub path: PathBuf,
}

pub struct Message {
    pub msg: String,
    pub source: OutputSource
}

pub fn parse_cli() -> ArgConfig {
    finish_cli(ArgConfig::parse())
}

fn finish_cli(mut cli: ArgConfig) -> ArgConfig {
    if let (None, None) = (cli.print.as_ref(), cli.output.as_ref()) {
        cli.print = Some(vec![
            OutputSource::Events,
            OutputSource::Stats,
        ]);
    }
    cli
}

pub fn parse_speed(s: &str) -> Result<f32, String> {
    let speed: f32 = s.trim().parse().map_err(|_| format!("Invalid speed '{}'", s))?;
    if (MIN_SPEED..=MAX_SPEED).contains(&speed) {
        Ok(speed)
    } else {
        Err(format!("Speed {} outside {}..={}", speed, MIN_SPEED, MAX_SPEED))
    }
}

fn parse_output_mappings(s: &str) -> Result<OutputMapping, String> {
    let parts: Vec<&str> = s.splitn(2, ':').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid format for output mapping '{}'. Use -o g,e:foo.txt",
            s
        ));
    }
    let sources: Vec<OutputSource> = parts[0]
        .split(',')
        .map(parse_source)
        .collect::<Result<Vec<_>, _>>()?;
    let path = PathBuf::from(parts[1]);
    Ok(OutputMapping { sources, path })
}

fn parse_source(s: &str) -> Result<OutputSource, String> {
     match s {
        "g" | "G" => Ok(OutputSource::Gamelog),
        "e" | "E" => Ok(OutputSource::Events),
        "s" | "S" => Ok(OutputSource::Stats),
        _ => Err(format!("Invalid source '{}'", s)),
    }
}

struct OutputConfig {
    files: Box<[BufWriter<File>]>,

    print: [bool; 3],
    output_files: [Box<[u8]>; 3],
}

impl OutputConfig {
    fn send(&mut self, msg: Message) -> io::Result<()> {
        let idx = msg.source as usize;
        if self.print[idx] {
            println!("{}", msg.msg);
        }
        for i in &self.output_files[idx] {
            writeln!(self.files[*i as usize], "{}", msg.msg)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.files.iter_mut().try_for_each(|f| f.flush())
    }
}


pub use crate::send;
#[macro_export]
macro_rules! send {
    ($tx:expr, $source:expr, $fmt:literal $(, $($args:expr),*)?) => {
        {
            let _ = $tx.send($crate::args::Message {
                msg: format!($fmt $(, $($args),*)?),
                source: $source
            });
        }
    };
}

pub fn spawn_reciever(cli: &ArgConfig) -> io::Result<(mpsc::UnboundedSender<Message>, tokio::task::JoinHandle<io::Result<()>>)> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut print = [false; 3];

    if let Some(prints) = &cli.print {
        for p in prints {
            print[*p as usize] = true;
        }
    }

    let mut files: Vec<BufWriter<File>> = vec![];
    let mut output_files: [Vec<u8>; 3] = core::array::from_fn(|_| vec![]);

    if let Some(output) = &cli.output {
        for (i, o) in output.iter().enumerate() {
            let buf = BufWriter::new(File::create(&o.path)?);
            files.push(buf);
            for s in &o.sources {
                output_files[*s as usize].push(i as u8);
            }
        }
    }

    let mut conf = OutputConfig {
        files: files.into(),
        print,
        output_files: output_files.map(Vec::into_boxed_slice)
    };

    let task = tokio::task::spawn(async move {
        while let Some(msg) = rx.recv().await {
            conf.send(msg)?;
        }
        conf.flush()
    });

    Ok((tx, task))
}
