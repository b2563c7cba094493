use std::ffi::OsStr;
use std::path::PathBuf;
use std::{fs::File, io::BufReader};

use eyre::{Result, WrapErr, bail};
use serde_derive::Deserialize;

use clap_serde_derive::{
    ClapSerde,
    clap::{self, ArgMatches, FromArgMatches, Parser, Subcommand, parser::ValueSource},
};

pub const DEFAULT_CONFIG_FILE: &str = "~/.config/eth-deposit/config.toml";

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Config file
    #[arg(short, long = "config", default_value = DEFAULT_CONFIG_FILE)]
    pub config_path: Option<String>,

    /// Global arguments
    #[command(flatten)]
    pub config: <CliArgs as ClapSerde>::Opt,

    // Subcommands
    #[command(subcommand)]
    pub command: CliCmd,
}

impl Cli {
    /// Config path with `~` and environment variables expanded
    pub fn expanded_config_path(&self) -> Result<Option<PathBuf>> {
        match &self.config_path {
            Some(path) => {
                let expanded = shellexpand::full(path).wrap_err_with(|| path.clone())?;
                Ok(Some(PathBuf::from(expanded.as_ref())))
            }
            None => Ok(None),
        }
    }
}

// Make sure all values are optional or parsing fails if a value
// is missing in the config file
#[derive(Debug, Clone, ClapSerde, Deserialize)]
pub struct CliArgs {
    /// Logging level
    #[arg(short, long = "log-level", required = false, default_value = "3")]
    pub log_level: u8,

    /// Network the deposits are signed for
    #[arg(short, long, required = false, default_value = "mainnet")]
    pub network: String,

    /// Directory for keystores and deposit data
    #[arg(short, long = "output-dir", required = false, default_value = "validator_keys")]
    pub output_dir: PathBuf,

    /// Print a root by root comparison of every deposit
    #[arg(short, long, required = false, action = clap::ArgAction::SetTrue)]
    pub diagnostics: bool,
}

impl CliArgs {
    /// Puts back every value typed on the command line
    fn keep_explicit(mut self, parsed: CliArgs, matches: &ArgMatches) -> Self {
        let explicit = |id: &str| matches.value_source(id) == Some(ValueSource::CommandLine);
        if explicit("log_level") {
            self.log_level = parsed.log_level;
        }
        if explicit("network") {
            self.network = parsed.network;
        }
        if explicit("output_dir") {
            self.output_dir = parsed.output_dir;
        }
        if explicit("diagnostics") {
            self.diagnostics = parsed.diagnostics;
        }
        self
    }
}

/// Global arguments in increasing priority: clap defaults, the config file,
/// flags given on the command line
pub fn load_args(matches: &ArgMatches, maybe_path: Option<PathBuf>) -> Result<CliArgs> {
    let merged = merge_args_from_file::<CliArgs>(Cli::from_arg_matches(matches)?.config, maybe_path)?;
    let parsed = CliArgs::from(Cli::from_arg_matches(matches)?.config);
    Ok(merged.keep_explicit(parsed, matches))
}

// Command line cmds
#[derive(Subcommand)]
pub enum CliCmd {
    /// Print version information
    #[clap(visible_alias = "ver")]
    Version {},
    /// Derive validator keys from a mnemonic and sign their deposits
    #[clap(visible_aliases = &["gen", "g"])]
    Generate {
        /// File containing the mnemonic phrase
        #[arg(long, visible_alias = "mf", required = false)]
        mnemonic_file: Option<PathBuf>,
        /// Mnemonic password
        #[arg(long, visible_alias = "mp", required = false)]
        mnemonic_password: Option<String>,
        /// First validator index
        #[arg(long, visible_alias = "i", required = false, default_value_t = 0)]
        start_index: u32,
        /// Number of validators
        #[arg(short, long, required = false, default_value_t = 1)]
        count: u32,
        /// Withdrawal credentials scheme (0: BLS, 1: execution, 2: compounding)
        #[arg(
            short,
            long,
            required = false,
            default_value_t = 0,
            value_parser = clap::value_parser!(u8).range(0..=2)
        )]
        scheme: u8,
        /// Withdrawal address, required by schemes 1 and 2
        #[arg(short = 'a', long, visible_alias = "addr", required = false)]
        execution_address: Option<String>,
        /// Eth amount per validator
        #[arg(short, long, visible_alias = "amount", required = false, default_value_t = 32.0)]
        eth: f64,
        /// Keystore encryption password
        #[arg(long, visible_alias = "kp", required = false)]
        keystore_password: Option<String>,
        /// Only write deposit data
        #[arg(long, required = false, action = clap::ArgAction::SetTrue)]
        no_keystores: bool,
        /// Skip user confirmation ("yes" prompt)
        #[arg(short, long, required = false, action = clap::ArgAction::SetTrue)]
        yes: bool,
    },
    /// Verify every record of a deposit data file
    #[clap(visible_alias = "v")]
    Verify {
        /// deposit_data-*.json file
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Print withdrawal credentials for a validator public key
    #[clap(visible_aliases = &["creds", "wc"])]
    Credentials {
        /// Validator public key
        #[arg(short, long = "pubkey", required = true)]
        pubkey: String,
        /// Withdrawal credentials scheme (0: BLS, 1: execution, 2: compounding)
        #[arg(
            short,
            long,
            required = false,
            default_value_t = 0,
            value_parser = clap::value_parser!(u8).range(0..=2)
        )]
        scheme: u8,
        /// Withdrawal address, required by schemes 1 and 2
        #[arg(short = 'a', long, visible_alias = "addr", required = false)]
        execution_address: Option<String>,
    },
}

pub fn merge_args_from_file<T>(
    args: <T as ClapSerde>::Opt,
    maybe_path: Option<PathBuf>,
) -> Result<T>
where
    T: ClapSerde + serde::de::DeserializeOwned,
{
    match maybe_path {
        Some(path) => {
            let config_path = std::path::Path::new(&path);
            match config_path.exists() {
                true => {
                    let config = match config_path.extension().and_then(OsStr::to_str) {
                        Some("toml") => read_toml_config::<T, _>(config_path),
                        Some("json") => read_json_config::<T, _>(config_path),
                        Some("jsonc") => read_jsonc_config::<T, _>(config_path),
                        _ => {
                            bail!("Unsupported config file type: {:?}", path);
                        }
                    }?;
                    // clap defaults make every cli field `Some`, file values
                    // replace them here and `load_args` restores explicit flags
                    Ok(T::from(args).merge(config))
                }
                false => Ok(T::from(args)),
            }
        }
        None => Ok(T::from(args)),
    }
}

fn read_toml_config<T, P>(path: P) -> Result<<T as ClapSerde>::Opt>
where
    P: AsRef<std::path::Path> + std::fmt::Debug + Copy,
    T: ClapSerde + serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path).wrap_err_with(|| format!("{:?}", path))?;
    Ok(toml::from_str(&content)?)
}

fn read_json_config<T: ClapSerde, P>(path: P) -> Result<<T as ClapSerde>::Opt>
where
    P: AsRef<std::path::Path> + std::fmt::Debug + Copy,
{
    let f = File::open(path).wrap_err_with(|| format!("{:?}", path))?;
    let json_cfg = serde_json::from_reader::<_, <T as ClapSerde>::Opt>(BufReader::new(f))?;
    Ok(json_cfg)
}

fn read_jsonc_config<T: ClapSerde, P>(path: P) -> Result<<T as ClapSerde>::Opt>
where
    P: AsRef<std::path::Path> + std::fmt::Debug + Copy,
{
    let f = File::open(path).wrap_err_with(|| format!("{:?}", path))?;
    let jsonc_cfg = serde_jsonc::from_reader::<_, <T as ClapSerde>::Opt>(BufReader::new(f))?;
    Ok(jsonc_cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("eth-deposit").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&["version"]);
        assert_eq!(cli.config_path.as_deref(), Some(DEFAULT_CONFIG_FILE));
        let args = merge_args_from_file::<CliArgs>(cli.config, None).unwrap();
        assert_eq!(args.log_level, 3);
        assert_eq!(args.network, "mainnet");
        assert_eq!(args.output_dir, PathBuf::from("validator_keys"));
        assert!(!args.diagnostics);
    }

    #[test]
    fn generate_arguments() {
        let cli = parse(&[
            "--network",
            "hoodi",
            "generate",
            "--count",
            "3",
            "--scheme",
            "1",
            "-a",
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "--eth",
            "1.5",
            "--yes",
        ]);
        match cli.command {
            CliCmd::Generate {
                count,
                scheme,
                execution_address,
                eth,
                yes,
                no_keystores,
                ..
            } => {
                assert_eq!(count, 3);
                assert_eq!(scheme, 1);
                assert!(execution_address.is_some());
                assert_eq!(eth, 1.5);
                assert!(yes);
                assert!(!no_keystores);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn scheme_out_of_range_is_rejected() {
        let result = Cli::try_parse_from(["eth-deposit", "credentials", "-p", "00", "-s", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_file_fills_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "network = \"sepolia\"\nlog_level = 5\n").unwrap();

        let cli = parse(&["version"]);
        let args = merge_args_from_file::<CliArgs>(cli.config, Some(path.clone())).unwrap();
        assert_eq!(args.network, "sepolia");
        assert_eq!(args.log_level, 5);

        // Fields absent from the file keep their parsed values
        let cli = parse(&["--output-dir", "/tmp/keys", "version"]);
        let args = merge_args_from_file::<CliArgs>(cli.config, Some(path)).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("/tmp/keys"));
        assert_eq!(args.network, "sepolia");
    }

    fn load(args: &[&str], path: Option<PathBuf>) -> CliArgs {
        let matches = Cli::command()
            .try_get_matches_from(std::iter::once("eth-deposit").chain(args.iter().copied()))
            .unwrap();
        load_args(&matches, path).unwrap()
    }

    #[test]
    fn explicit_flags_beat_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "network = \"sepolia\"\nlog_level = 5\noutput_dir = \"/tmp/file\"\n",
        )
        .unwrap();

        let args = load(&["--network", "hoodi", "version"], Some(path.clone()));
        assert_eq!(args.network, "hoodi");
        assert_eq!(args.log_level, 5);
        assert_eq!(args.output_dir, PathBuf::from("/tmp/file"));

        let args = load(&["-l", "1", "-o", "/tmp/cli", "version"], Some(path.clone()));
        assert_eq!(args.network, "sepolia");
        assert_eq!(args.log_level, 1);
        assert_eq!(args.output_dir, PathBuf::from("/tmp/cli"));

        // Defaults alone never override the file
        let args = load(&["version"], Some(path));
        assert_eq!(args.network, "sepolia");
        assert_eq!(args.log_level, 5);
    }

    #[test]
    fn explicit_flags_without_config_file() {
        let args = load(&["--network", "holesky", "-d", "version"], None);
        assert_eq!(args.network, "holesky");
        assert!(args.diagnostics);
        assert_eq!(args.log_level, 3);
    }

    #[test]
    fn jsonc_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        std::fs::write(&path, "{\n  // signed offline\n  \"diagnostics\": true\n}").unwrap();
        let cli = parse(&["version"]);
        let args = merge_args_from_file::<CliArgs>(cli.config, Some(path)).unwrap();
        assert!(args.diagnostics);
    }

    #[test]
    fn unknown_config_type_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "network: hoodi").unwrap();
        let cli = parse(&["version"]);
        assert!(merge_args_from_file::<CliArgs>(cli.config, Some(path)).is_err());
    }

    #[test]
    fn missing_config_file_is_ignored() {
        let cli = parse(&["version"]);
        let args =
            merge_args_from_file::<CliArgs>(cli.config, Some(PathBuf::from("/nonexistent.toml")))
                .unwrap();
        assert_eq!(args.network, "mainnet");
    }
}
