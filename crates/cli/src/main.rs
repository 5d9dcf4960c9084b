use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use enigma::api::{
    draw_settings, parse_rotor_list, parse_settings, run_search, CancelToken, Crib, CribOffset,
    IocBand, KeyGenCfg, KeyReplay, Language, LetterTargets, Machine, MachineSettings, Plugboard,
    PlugboardSearch, ReflectorModel, RotorModel, ScorerFlags, SearchBounds, SearchContext,
    SearchOutcome, SearchStatus, WordSplit, DEFAULT_MIN_MATCHES,
};
use enigma::EnigmaError;
use serde::Serialize;
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::fmt::SubscriberBuilder;

mod loaders;
mod provenance;
mod text;

#[derive(Parser)]
#[command(name = "enigma-cli")]
#[command(about = "Enigma simulator and ciphertext-only key search")]
struct Cmd {
    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Encipher (or decipher) text with one key
    Encode(EncodeArgs),
    /// Search a keyspace for the keys that best decipher a ciphertext
    Crack(CrackArgs),
    /// Print build provenance and the rotor catalog as JSON
    Report,
}

#[derive(Args)]
struct EncodeArgs {
    /// Rotors, leftmost first, e.g. "I II III" or "Beta-II-IV-I"
    #[arg(long, default_value = "I II III")]
    rotors: String,
    /// Ring settings as letters ("AAA") or 1-based numbers; default all A
    #[arg(long)]
    rings: Option<String>,
    /// Start positions as letters ("ADU") or 1-based numbers; default all A
    #[arg(long)]
    positions: Option<String>,
    #[arg(long, default_value = "B")]
    reflector: ReflectorModel,
    /// Plugboard pairs, e.g. "AB CD EF"
    #[arg(long)]
    plugboard: Option<String>,

    /// Draw a random key instead of reading the key flags
    #[arg(long, conflicts_with_all = ["rotors", "rings", "positions", "reflector", "plugboard"])]
    random_key: bool,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 3)]
    rotor_count: usize,
    #[arg(long, default_value_t = 10)]
    plug_pairs: usize,

    /// Text to encode; read from stdin when absent
    #[arg(long)]
    text: Option<String>,
    /// Print the machine state as JSON on stderr before encoding
    #[arg(long)]
    show_config: bool,
}

#[derive(Args)]
struct CrackArgs {
    /// Ciphertext file; read from stdin when absent. Non-letters are dropped.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Rotors available to every slot
    #[arg(long, default_value = "I II III IV V")]
    catalog: String,
    #[arg(long, default_value_t = 3)]
    slots: usize,
    /// Restrict one slot, e.g. "1=Beta,Gamma" (slot 1 is leftmost); repeatable
    #[arg(long = "slot", value_parser = parse_slot_rotors)]
    slot_rotors: Vec<(usize, Vec<RotorModel>)>,
    /// Candidate reflectors, e.g. "B C"
    #[arg(long, default_value = "B")]
    reflectors: String,
    /// Fixed ring settings; default all A
    #[arg(long, conflicts_with = "search_rings")]
    rings: Option<String>,
    /// Try every ring setting instead of fixing them
    #[arg(long)]
    search_rings: bool,
    /// Fixed start positions; default tries all
    #[arg(long)]
    positions: Option<String>,

    /// Known plaintext fragment
    #[arg(long)]
    crib: Option<String>,
    /// Zero-based plaintext offset of the crib; anywhere when absent
    #[arg(long, requires = "crib")]
    crib_offset: Option<usize>,
    /// N-gram counts file (`n lines` header with `count gram` lines, or `gram count` lines)
    #[arg(long)]
    ngrams: Option<PathBuf>,
    /// Word list for the dictionary filter
    #[arg(long)]
    dictionary: Option<PathBuf>,
    /// Distinct dictionary words a candidate must contain
    #[arg(long, default_value_t = DEFAULT_MIN_MATCHES)]
    min_words: usize,
    /// Plaintext separates words with X; dictionary words must match whole pieces
    #[arg(long)]
    x_separated: bool,
    /// Plaintext language for the IoC band
    #[arg(long, default_value = "english")]
    language: Language,
    /// Explicit IoC band in normalized units, "CENTER:TOLERANCE" (e.g. "1.75:0.25")
    #[arg(long, value_parser = parse_band)]
    band: Option<IocBand>,
    /// Minimum frequency of each letter A-Z for the frequency scorer,
    /// 26 comma-separated values
    #[arg(long)]
    letter_targets: Option<String>,
    /// Slack subtracted from every letter target
    #[arg(long, default_value_t = 0.0)]
    letter_offset: f64,
    /// Enabled scorers: letters from D, F, K, or "all" / "none".
    /// Default: K with a crib, D with a dictionary, otherwise F.
    #[arg(long)]
    scorers: Option<String>,

    #[arg(long, default_value_t = 10)]
    top: usize,
    #[arg(long)]
    threads: Option<usize>,
    /// Stop after this many seconds and report the best keys so far
    #[arg(long)]
    timeout: Option<f64>,

    /// Fixed plugboard pairs for every candidate
    #[arg(long, conflicts_with = "hill_climb")]
    plugboard: Option<String>,
    /// Recover up to this many plugboard pairs by hill climbing
    #[arg(long)]
    hill_climb: Option<usize>,
    /// Rotor settings the hill climb starts from
    #[arg(long, default_value_t = 10)]
    climb_candidates: usize,

    /// Write the outcome as JSON here, with a provenance sidecar
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Encode(args) => encode(args),
        Action::Crack(args) => crack(args),
        Action::Report => report(),
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading stdin")?;
    Ok(buf)
}

fn parse_slot_rotors(s: &str) -> Result<(usize, Vec<RotorModel>)> {
    let (slot, rotors) = s
        .split_once('=')
        .context("expected SLOT=ROTORS, e.g. 1=Beta,Gamma")?;
    let slot: usize = slot.trim().parse().context("slot must be a number")?;
    if slot == 0 {
        bail!("slots are numbered from 1");
    }
    Ok((slot - 1, parse_rotor_list(rotors)?))
}

fn parse_band(s: &str) -> Result<IocBand> {
    let (center, tolerance) = s
        .split_once(':')
        .context("expected CENTER:TOLERANCE, e.g. 1.75:0.25")?;
    let center: f64 = center.trim().parse().context("band center")?;
    let tolerance: f64 = tolerance.trim().parse().context("band tolerance")?;
    Ok(IocBand::normalized(center, tolerance)?)
}

fn parse_scorers(s: &str) -> Result<ScorerFlags> {
    match s.trim().to_ascii_lowercase().as_str() {
        "all" => return Ok(ScorerFlags::ALL),
        "none" => return Ok(ScorerFlags::NONE),
        _ => {}
    }
    let mut flags = ScorerFlags::NONE;
    for c in s.chars().filter(|c| !c.is_whitespace() && *c != '-' && *c != ',') {
        flags |= match c.to_ascii_uppercase() {
            'D' => ScorerFlags::DICTIONARY_MATCH,
            'F' => ScorerFlags::FREQUENCY,
            'K' => ScorerFlags::KNOWN_PLAINTEXT,
            other => bail!("unknown scorer {other:?} (expected D, F or K)"),
        };
    }
    Ok(flags)
}

fn encode_settings(args: &EncodeArgs) -> Result<MachineSettings> {
    if args.random_key {
        let cfg = KeyGenCfg {
            rotor_count: args.rotor_count,
            plug_pairs: args.plug_pairs,
        };
        return Ok(draw_settings(cfg, KeyReplay::new(args.seed))?);
    }
    let rotors = parse_rotor_list(&args.rotors)?;
    let n = rotors.len();
    let rings = match &args.rings {
        Some(s) => parse_settings(s).context("--rings")?,
        None => vec![0; n],
    };
    let positions = match &args.positions {
        Some(s) => parse_settings(s).context("--positions")?,
        None => vec![0; n],
    };
    let plugboard: Plugboard = match &args.plugboard {
        Some(s) => s.parse().context("--plugboard")?,
        None => Plugboard::empty(),
    };
    Ok(MachineSettings {
        rotors,
        rings,
        positions,
        reflector: args.reflector,
        plugboard: plugboard.pairs(),
    })
}

fn encode(args: EncodeArgs) -> Result<()> {
    let settings = encode_settings(&args)?;
    tracing::info!(key = %settings, "encode");
    let mut machine = Machine::from_settings(&settings)?;
    if args.show_config {
        eprintln!("{}", serde_json::to_string_pretty(&machine.snapshot())?);
    }
    match &args.text {
        Some(t) => println!("{}", text::encode_preserving(&mut machine, t)),
        None => print!("{}", text::encode_preserving(&mut machine, &read_stdin()?)),
    }
    Ok(())
}

fn crack_bounds(args: &CrackArgs) -> Result<SearchBounds> {
    let catalog = parse_rotor_list(&args.catalog).context("--catalog")?;
    let reflectors = args
        .reflectors
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<Vec<ReflectorModel>, EnigmaError>>()
        .context("--reflectors")?;
    let mut bounds = SearchBounds::new(catalog, args.slots).with_reflectors(reflectors);
    for (slot, allowed) in &args.slot_rotors {
        bounds = bounds.with_slot_rotors(*slot, allowed.clone());
    }
    if !args.search_rings {
        let rings = match &args.rings {
            Some(s) => parse_settings(s).context("--rings")?,
            None => vec![0; args.slots],
        };
        bounds = bounds.with_fixed_rings(&rings);
    }
    if let Some(s) = &args.positions {
        bounds = bounds.with_fixed_positions(&parse_settings(s).context("--positions")?);
    }
    let plugboard = match (&args.plugboard, args.hill_climb) {
        (_, Some(max_pairs)) => PlugboardSearch::HillClimb {
            max_pairs,
            candidates: args.climb_candidates,
        },
        (Some(s), None) => PlugboardSearch::Fixed(s.parse().context("--plugboard")?),
        (None, None) => PlugboardSearch::default(),
    };
    Ok(bounds.with_plugboard(plugboard))
}

fn crack_scorers(args: &CrackArgs) -> Result<ScorerFlags> {
    if let Some(s) = &args.scorers {
        return parse_scorers(s).context("--scorers");
    }
    let mut flags = ScorerFlags::NONE;
    if args.crib.is_some() {
        flags |= ScorerFlags::KNOWN_PLAINTEXT;
    }
    if args.dictionary.is_some() {
        flags |= ScorerFlags::DICTIONARY_MATCH;
    }
    if flags.is_empty() {
        flags = ScorerFlags::FREQUENCY;
    }
    Ok(flags)
}

fn crack_letter_targets(args: &CrackArgs) -> Result<Option<LetterTargets>> {
    args.letter_targets
        .as_deref()
        .map(|s| LetterTargets::parse(s, args.letter_offset))
        .transpose()
        .context("--letter-targets")
}

fn crack(args: CrackArgs) -> Result<()> {
    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading ciphertext {}", path.display()))?,
        None => read_stdin()?,
    };
    let ciphertext = text::sanitize(&raw);
    let bounds = crack_bounds(&args)?;
    let scorers = crack_scorers(&args)?;

    let ngrams = args.ngrams.as_deref().map(loaders::load_ngrams).transpose()?;
    let dictionary = args
        .dictionary
        .as_deref()
        .map(loaders::load_dictionary)
        .transpose()?
        .map(|d| {
            d.with_split(if args.x_separated {
                WordSplit::XSeparated
            } else {
                WordSplit::Stream
            })
        });
    let letter_targets = crack_letter_targets(&args)?;
    let crib = args
        .crib
        .as_deref()
        .map(|c| {
            let offset = args.crib_offset.map_or(CribOffset::Anywhere, CribOffset::At);
            Crib::new(&text::sanitize(c), offset)
        })
        .transpose()
        .context("--crib")?;

    let mut cancel = CancelToken::new();
    if let Some(secs) = args.timeout {
        let timeout = Duration::try_from_secs_f64(secs).context("--timeout")?;
        cancel = cancel.with_timeout(timeout);
    }
    let ctx = SearchContext {
        ngrams: ngrams.as_ref(),
        dictionary: dictionary.as_ref(),
        dictionary_min_matches: args.min_words,
        crib: crib.as_ref(),
        band: args.band.unwrap_or_else(|| args.language.band()),
        letter_targets: letter_targets.as_ref(),
        threads: args.threads,
        cancel,
    };

    let outcome = match run_search(&ciphertext, &bounds, scorers, args.top, &ctx) {
        Ok(outcome) => outcome,
        Err(e) if !e.is_fatal() => {
            tracing::warn!(error = %e, "nothing to search");
            return Ok(());
        }
        Err(e) => return Err(e).context("search failed"),
    };
    if outcome.status == SearchStatus::Cancelled {
        tracing::warn!(
            evaluated = outcome.evaluated,
            keyspace = outcome.keyspace_len,
            "search stopped early; results are partial"
        );
    }
    for line in result_lines(&outcome) {
        println!("{line}");
    }

    if let Some(out) = &args.out {
        let params = crack_params(&args, scorers, letter_targets);
        write_outcome(out, &params, &ciphertext, &outcome)?;
    }
    Ok(())
}

/// Contents of the `--out` file.
#[derive(Serialize)]
struct CrackReport<'a> {
    ciphertext: &'a str,
    outcome: &'a SearchOutcome,
}

/// `<score> <flags> <key>` per record, best first.
fn result_lines(outcome: &SearchOutcome) -> Vec<String> {
    outcome
        .records
        .iter()
        .map(|r| format!("{:.6} {} {}", r.score, r.flags, r.key))
        .collect()
}

fn crack_params(
    args: &CrackArgs,
    scorers: ScorerFlags,
    letter_targets: Option<LetterTargets>,
) -> provenance::CrackParams {
    let slot_rotors = args
        .slot_rotors
        .iter()
        .map(|(slot, rotors)| {
            let names: Vec<&str> = rotors.iter().map(|m| m.name()).collect();
            format!("{}={}", slot + 1, names.join(","))
        })
        .collect();
    let rings = if args.search_rings {
        "all".to_string()
    } else {
        args.rings.clone().unwrap_or_else(|| "A".repeat(args.slots))
    };
    provenance::CrackParams {
        catalog: args.catalog.clone(),
        slots: args.slots,
        slot_rotors,
        reflectors: args.reflectors.clone(),
        rings,
        positions: args.positions.clone(),
        crib: args.crib.clone(),
        crib_offset: args.crib_offset,
        ngrams: args.ngrams.clone(),
        dictionary: args.dictionary.clone(),
        x_separated: args.x_separated,
        min_words: args.min_words,
        band: args.band.unwrap_or_else(|| args.language.band()),
        letter_targets,
        scorers: scorers.to_string(),
        top: args.top,
        threads: args.threads,
        timeout: args.timeout,
        plugboard: args.plugboard.clone(),
        hill_climb: args.hill_climb,
        climb_candidates: args.climb_candidates,
    }
}

fn write_outcome(
    out: &std::path::Path,
    params: &provenance::CrackParams,
    ciphertext: &str,
    outcome: &SearchOutcome,
) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let doc = CrackReport {
        ciphertext,
        outcome,
    };
    std::fs::write(out, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", out.display()))?;
    let sidecar = provenance::write_sidecar(out, params, outcome)?;
    tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "wrote results");
    Ok(())
}

fn report() -> Result<()> {
    let rotors: Vec<_> = RotorModel::ALL
        .iter()
        .map(|m| json!({"name": m.name(), "notches": m.notches(), "greek": m.is_greek()}))
        .collect();
    let reflectors: Vec<_> = ReflectorModel::ALL
        .iter()
        .map(|m| json!({"name": m.name(), "thin": m.is_thin()}))
        .collect();
    let obj = json!({
        "build": provenance::BuildInfo::collect(),
        "rotors": rotors,
        "reflectors": reflectors,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn crack_args(argv: &[&str]) -> CrackArgs {
        let mut full = vec!["enigma-cli", "crack"];
        full.extend_from_slice(argv);
        match Cmd::try_parse_from(full).unwrap().action {
            Action::Crack(args) => args,
            _ => unreachable!(),
        }
    }

    fn encode_args(argv: &[&str]) -> EncodeArgs {
        let mut full = vec!["enigma-cli", "encode"];
        full.extend_from_slice(argv);
        match Cmd::try_parse_from(full).unwrap().action {
            Action::Encode(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn encode_flags_build_the_key() {
        let args = encode_args(&[
            "--rotors", "IV-II-V", "--rings", "1 2 3", "--positions", "QEV", "--reflector",
            "ukw-c", "--plugboard", "AB CD",
        ]);
        let key = encode_settings(&args).unwrap();
        assert_eq!(key.rotors, vec![RotorModel::IV, RotorModel::II, RotorModel::V]);
        assert_eq!(key.rings, vec![0, 1, 2]);
        assert_eq!(key.positions, vec![16, 4, 21]);
        assert_eq!(key.reflector, ReflectorModel::C);
        assert_eq!(key.plugboard, vec![(0, 1), (2, 3)]);

        let default = encode_settings(&encode_args(&[])).unwrap();
        assert_eq!(default, MachineSettings::default());
    }

    #[test]
    fn random_keys_replay_from_the_seed() {
        let a = encode_settings(&encode_args(&["--random-key", "--seed", "7"])).unwrap();
        let b = encode_settings(&encode_args(&["--random-key", "--seed", "7"])).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.plugboard.len(), 10);
        assert!(
            Cmd::try_parse_from(["enigma-cli", "encode", "--random-key", "--rotors", "I II III"])
                .is_err()
        );
    }

    #[test]
    fn scorer_selection() {
        assert_eq!(
            parse_scorers("DK").unwrap(),
            ScorerFlags::DICTIONARY_MATCH | ScorerFlags::KNOWN_PLAINTEXT
        );
        assert_eq!(
            parse_scorers("d-f-").unwrap(),
            ScorerFlags::DICTIONARY_MATCH | ScorerFlags::FREQUENCY
        );
        assert_eq!(parse_scorers("all").unwrap(), ScorerFlags::ALL);
        assert_eq!(parse_scorers("none").unwrap(), ScorerFlags::NONE);
        assert!(parse_scorers("X").is_err());

        let args = crack_args(&["--crib", "WETTER"]);
        assert_eq!(crack_scorers(&args).unwrap(), ScorerFlags::KNOWN_PLAINTEXT);
        let args = crack_args(&[]);
        assert_eq!(crack_scorers(&args).unwrap(), ScorerFlags::FREQUENCY);
    }

    #[test]
    fn slot_and_band_parsers() {
        let (slot, rotors) = parse_slot_rotors("1=Beta,Gamma").unwrap();
        assert_eq!(slot, 0);
        assert_eq!(rotors, vec![RotorModel::Beta, RotorModel::Gamma]);
        assert!(parse_slot_rotors("0=I").is_err());
        assert!(parse_slot_rotors("I").is_err());

        let band = parse_band("2.0:0.25").unwrap();
        assert_eq!(band, Language::German.band());
        assert!(parse_band("2.0").is_err());
        assert!(parse_band("-1:0.1").is_err());
    }

    #[test]
    fn crack_bounds_follow_flags() {
        let args = crack_args(&[
            "--catalog", "I II III", "--slot", "1=II", "--reflectors", "B C", "--positions",
            "MCK", "--hill-climb", "6",
        ]);
        let bounds = crack_bounds(&args).unwrap();
        assert_eq!(bounds.slot_rotors, vec![(0, vec![RotorModel::II])]);
        assert_eq!(bounds.reflectors, vec![ReflectorModel::B, ReflectorModel::C]);
        assert_eq!(bounds.rings, vec![vec![0], vec![0], vec![0]]);
        assert_eq!(bounds.positions, vec![vec![12], vec![2], vec![10]]);
        assert_eq!(
            bounds.plugboard,
            PlugboardSearch::HillClimb {
                max_pairs: 6,
                candidates: 10
            }
        );

        let args = crack_args(&["--search-rings"]);
        let bounds = crack_bounds(&args).unwrap();
        assert_eq!(bounds.rings[0].len(), 26);
        let both = ["enigma-cli", "crack", "--rings", "AAA", "--search-rings"];
        assert!(Cmd::try_parse_from(both).is_err());
    }

    #[test]
    fn crack_writes_results_and_sidecar() {
        let plain = "WEATHERREPORTFORTHENORTHSEAXSTORMWARNING";
        let key = MachineSettings {
            rotors: vec![RotorModel::II, RotorModel::III, RotorModel::I],
            positions: vec![12, 2, 10],
            ..MachineSettings::default()
        };
        let cipher = Machine::from_settings(&key).unwrap().encode(plain).unwrap();

        let dir = tempdir().unwrap();
        let input = dir.path().join("cipher.txt");
        std::fs::write(&input, format!("{} {}\n", &cipher[..5], &cipher[5..])).unwrap();
        let out = dir.path().join("runs").join("crack.json");
        let args = crack_args(&[
            "--input",
            input.to_str().unwrap(),
            "--catalog",
            "I II III",
            "--slot",
            "1=II",
            "--slot",
            "2=III",
            "--crib",
            "weather report",
            "--crib-offset",
            "0",
            "--top",
            "3",
            "--threads",
            "2",
            "--out",
            out.to_str().unwrap(),
        ]);
        crack(args).unwrap();

        let doc: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(doc["ciphertext"], cipher.as_str());
        assert_eq!(doc["outcome"]["status"], "Completed");
        assert_eq!(doc["outcome"]["records"][0]["key"]["positions"], json!([12, 2, 10]));
        let sidecar = dir.path().join("runs").join("crack.provenance.json");
        let prov: serde_json::Value =
            serde_json::from_slice(&std::fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(prov["params"]["scorers"], "--K");
        assert_eq!(prov["outcome"]["best_key"], key.to_string());
        assert_eq!(prov["params"]["rings"], "AAA");
    }

    #[test]
    fn letter_target_flags() {
        let targets = vec!["0.01"; 26].join(",");
        let args = crack_args(&["--letter-targets", &targets, "--letter-offset", "0.005"]);
        let parsed = crack_letter_targets(&args).unwrap().unwrap();
        assert_eq!(parsed.targets()[0], 0.01);
        assert_eq!(parsed.offset(), 0.005);

        assert!(crack_letter_targets(&crack_args(&[])).unwrap().is_none());
        let short = crack_args(&["--letter-targets", "0.1,0.2"]);
        assert!(crack_letter_targets(&short).is_err());
    }

    #[test]
    fn x_separated_flag_changes_dictionary_matching() {
        let key = MachineSettings {
            rotors: vec![RotorModel::II, RotorModel::III, RotorModel::I],
            positions: vec![12, 2, 10],
            ..MachineSettings::default()
        };
        let cipher = Machine::from_settings(&key)
            .unwrap()
            .encode("HELLOXWORLDXFOOXBAR")
            .unwrap();

        let dir = tempdir().unwrap();
        let input = dir.path().join("cipher.txt");
        std::fs::write(&input, &cipher).unwrap();
        let words = dir.path().join("words.txt");
        std::fs::write(&words, "HELL\nWORL\nFOO\nBAR\n").unwrap();

        let records = |x_separated: bool| {
            let out = dir.path().join(format!("x{x_separated}.json"));
            let mut argv = vec![
                "--input",
                input.to_str().unwrap(),
                "--catalog",
                "I II III",
                "--slot",
                "1=II",
                "--slot",
                "2=III",
                "--positions",
                "MCK",
                "--dictionary",
                words.to_str().unwrap(),
                "--min-words",
                "3",
                "--out",
                out.to_str().unwrap(),
            ];
            if x_separated {
                argv.push("--x-separated");
            }
            crack(crack_args(&argv)).unwrap();
            let doc: serde_json::Value =
                serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
            let sidecar: serde_json::Value = serde_json::from_slice(
                &std::fs::read(provenance::sidecar_path_for(&out)).unwrap(),
            )
            .unwrap();
            assert_eq!(sidecar["params"]["x_separated"], x_separated);
            doc["outcome"]["records"].as_array().unwrap().len()
        };
        // Four substrings in the stream, but only FOO and BAR are whole words.
        assert_eq!(records(false), 1);
        assert_eq!(records(true), 0);
    }

    #[test]
    fn result_lines_match_the_report_format() {
        let key = MachineSettings::default();
        let outcome = SearchOutcome {
            records: vec![enigma::api::ScoreRecord {
                key: key.clone(),
                score: 0.0661,
                flags: ScorerFlags::DICTIONARY_MATCH | ScorerFlags::FREQUENCY,
                index: 0,
            }],
            status: SearchStatus::Completed,
            evaluated: 1,
            keyspace_len: 1,
            elapsed: Duration::ZERO,
        };
        assert_eq!(
            result_lines(&outcome),
            vec!["0.066100 DF- I-II-III UKW-B rings AAA start AAA".to_string()]
        );
    }
}
