use std::fs;
use std::path::{Path, PathBuf};

use blocktype_scan::{
    Classifier, ClassifyError, Driver, DriverConfig, DriverStats, InputPath, Reporter, Sampler,
    TypeCode,
};
use tempfile::TempDir;

const NAMES: [&str; 4] = ["EMPTY", "LOW", "MID", "HIGH"];

/// Classifier that records exactly which bytes each classification saw.
#[derive(Default)]
struct Recording {
    pending: Vec<u8>,
    classified: Vec<Vec<u8>>,
    clears: usize,
}

impl Classifier for Recording {
    fn update(&mut self, bytes: &[u8]) -> Result<(), ClassifyError> {
        self.pending.extend_from_slice(bytes);
        Ok(())
    }

    fn classify(&mut self) -> Result<TypeCode, ClassifyError> {
        self.classified.push(self.pending.clone());
        Ok(match self.pending.first() {
            None => 0,
            Some(&b) => 1 + u32::from(b) % 3,
        })
    }

    fn clear(&mut self) {
        self.pending.clear();
        self.clears += 1;
    }

    fn name_for_type(&self, code: TypeCode) -> Option<&str> {
        NAMES.get(code as usize).copied()
    }

    fn type_for_name(&self, name: &str) -> Option<TypeCode> {
        NAMES.iter().position(|n| *n == name).map(|i| i as TypeCode)
    }
}

struct Run {
    lines: Vec<String>,
    ranges: Vec<String>,
    classified: Vec<Vec<u8>>,
    pending_after: usize,
    stats: DriverStats,
}

fn write_file(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn run(config: DriverConfig, inputs: &[&Path]) -> Result<Run, ClassifyError> {
    let mut recording = Recording::default();
    let reporter = Reporter::new(Vec::new(), Vec::new(), config.report_ranges);
    let mut driver = Driver::new(config, &mut recording, reporter)?;
    for input in inputs {
        driver.process(&InputPath::parse(input))?;
    }
    let stats = driver.finish()?;
    let (_, reporter) = driver.into_parts();
    let (out, err) = reporter.into_inner();

    Ok(Run {
        lines: String::from_utf8(out).unwrap().lines().map(String::from).collect(),
        ranges: String::from_utf8(err).unwrap().lines().map(String::from).collect(),
        classified: recording.classified,
        pending_after: recording.pending.len(),
        stats,
    })
}

fn offsets(lines: &[String]) -> Vec<u64> {
    lines
        .iter()
        .map(|line| line.split_whitespace().next().unwrap().parse().unwrap())
        .collect()
}

fn block_config(block_size: usize) -> DriverConfig {
    DriverConfig::builder()
        .block_size(block_size)
        .block_mode(true)
        .build()
        .unwrap()
}

#[test]
fn test_two_full_blocks_give_two_results() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "data.bin", &pattern(1024));

    let run = run(block_config(512), &[&path]).unwrap();

    assert_eq!(run.lines.len(), 2);
    assert_eq!(offsets(&run.lines), vec![0, 512]);
    assert_eq!(run.classified.len(), 2);
    assert!(run.classified.iter().all(|c| c.len() == 512));
    assert_eq!(run.classified[1], pattern(1024)[512..].to_vec());
    assert!(run.lines[0].ends_with(&format!("# {}", path.display())));
}

#[test]
fn test_whole_file_mode_classifies_everything_once() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "small.txt", &pattern(300));

    let run = run(DriverConfig::default(), &[&path]).unwrap();

    assert_eq!(offsets(&run.lines), vec![0]);
    assert_eq!(run.classified, vec![pattern(300)]);
    assert_eq!(run.stats.boundaries, 1);
}

#[test]
fn test_skip_header_ignores_first_block() {
    let dir = TempDir::new().unwrap();
    let data = pattern(1024);
    let path = write_file(&dir, "skip.bin", &data);

    let config = DriverConfig {
        skip_header: true,
        ..block_config(512)
    };
    let run = run(config, &[&path]).unwrap();

    assert_eq!(offsets(&run.lines), vec![512]);
    assert_eq!(run.classified, vec![data[512..].to_vec()]);
    assert_eq!(run.stats.bytes_accumulated, 512);
}

#[test]
fn test_skip_header_in_whole_file_mode_reports_offset_zero() {
    let dir = TempDir::new().unwrap();
    let data = pattern(1024);
    let path = write_file(&dir, "skip.bin", &data);

    let config = DriverConfig {
        skip_header: true,
        ..DriverConfig::default()
    };
    let run = run(config, &[&path]).unwrap();

    assert_eq!(offsets(&run.lines), vec![0]);
    assert_eq!(run.classified, vec![data[512..].to_vec()]);
}

#[test]
fn test_byte_and_boundary_accounting() {
    let dir = TempDir::new().unwrap();
    for len in [0usize, 1, 511, 512, 513, 1536, 2000] {
        let path = write_file(&dir, &format!("len_{len}.bin"), &pattern(len));

        let blocks = run(block_config(512), &[&path]).unwrap();
        assert_eq!(blocks.stats.bytes_accumulated, len as u64, "len {len}");
        assert_eq!(blocks.stats.boundaries, (len / 512) as u64, "len {len}");
        assert_eq!(blocks.lines.len(), len / 512, "len {len}");

        let whole = run(DriverConfig::default(), &[&path]).unwrap();
        assert_eq!(whole.stats.bytes_accumulated, len as u64, "len {len}");
        assert_eq!(whole.stats.boundaries, 1, "len {len}");
        assert_eq!(whole.classified, vec![pattern(len)], "len {len}");
    }
}

#[test]
fn test_zero_percentage_emits_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "data.bin", &pattern(4096));

    for block_mode in [true, false] {
        let config = DriverConfig {
            block_mode,
            percentage: 0,
            ..DriverConfig::default()
        };
        let run = run(config, &[&path]).unwrap();

        assert!(run.lines.is_empty());
        assert!(run.classified.is_empty());
        assert!(run.stats.boundaries > 0);
        assert_eq!(run.stats.accepted, 0);
        assert_eq!(run.pending_after, 0, "state must be cleared after the input");
    }
}

#[test]
fn test_percentage_above_100_emits_every_boundary() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "data.bin", &pattern(512 * 6));

    let config = DriverConfig {
        block_mode: true,
        percentage: 150,
        ..DriverConfig::default()
    };
    let run = run(config, &[&path]).unwrap();

    assert_eq!(run.stats.boundaries, 6);
    assert_eq!(run.stats.accepted, 6);
    assert_eq!(offsets(&run.lines), vec![0, 512, 1024, 1536, 2048, 2560]);
}

#[test]
fn test_rejected_blocks_keep_accumulating() {
    let dir = TempDir::new().unwrap();
    let data = pattern(512 * 40);
    let path = write_file(&dir, "sampled.bin", &data);
    let input = InputPath::parse(&path);

    let mut sampler = Sampler::for_path(50, 11, input.as_bytes());
    let decisions: Vec<bool> = (0..40).map(|_| sampler.accept()).collect();

    let mut expected_offsets = Vec::new();
    let mut expected_lengths = Vec::new();
    let mut since = 0;
    for (i, accepted) in decisions.iter().enumerate() {
        if *accepted {
            expected_offsets.push((i * 512) as u64);
            expected_lengths.push((i + 1) * 512 - since);
            since = (i + 1) * 512;
        }
    }

    let config = DriverConfig {
        percentage: 50,
        seed: 11,
        ..block_config(512)
    };
    let run = run(config, &[&path]).unwrap();

    assert_eq!(offsets(&run.lines), expected_offsets);
    let lengths: Vec<usize> = run.classified.iter().map(Vec::len).collect();
    assert_eq!(lengths, expected_lengths);
    assert_eq!(run.stats.boundaries, 40);
    assert_eq!(run.pending_after, 0);
}

#[test]
fn test_sampling_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "repeat.bin", &pattern(512 * 64));

    let config = DriverConfig {
        percentage: 30,
        seed: 1234,
        ..block_config(512)
    };
    let first = run(config.clone(), &[&path]).unwrap();
    let second = run(config, &[&path]).unwrap();

    assert_eq!(first.lines, second.lines);
    assert!(!first.lines.is_empty());
    assert!(first.lines.len() < 64);
}

#[test]
fn test_sampling_depends_on_path() {
    let sequence = |path: &[u8]| {
        let mut sampler = Sampler::for_path(50, 7, path);
        (0..64).map(|_| sampler.accept()).collect::<Vec<_>>()
    };

    let base = sequence(b"/evidence/image.dd");
    assert_eq!(base, sequence(b"/evidence/image.dd"));
    let others = [
        b"/evidence/image.de".as_slice(),
        b"/evidence/image.dc",
        b"/evidence/Image.dd",
    ];
    assert!(others.iter().any(|p| sequence(*p) != base));
}

#[test]
fn test_training_mode_classifies_without_output() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "train.bin", &pattern(1024));

    let config = DriverConfig {
        training: true,
        report_ranges: true,
        ..block_config(512)
    };
    let run = run(config, &[&path]).unwrap();

    assert!(run.lines.is_empty());
    assert_eq!(run.classified.len(), 2);
    assert_eq!(run.stats.emitted, 0);
    assert_eq!(run.ranges, vec!["0-512", "512-1024"]);
}

#[test]
fn test_range_report_in_whole_file_mode() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "ranges.bin", &pattern(1300));

    let config = DriverConfig {
        report_ranges: true,
        skip_header: true,
        ..DriverConfig::default()
    };
    let run = run(config, &[&path]).unwrap();

    assert_eq!(run.ranges, vec!["512-1300"]);
}

#[test]
fn test_directory_inputs_do_not_leak_state() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    let a = write_file(&dir, "a.bin", &[1u8; 700]);
    let b = write_file(&dir, "nested/b.bin", &[2u8; 100]);

    let run = run(block_config(512), &[dir.path()]).unwrap();

    // a.bin: one full block, then 188 trailing bytes dropped with the input.
    // b.bin: never reaches a full block.
    assert_eq!(run.lines.len(), 1);
    assert!(run.lines[0].ends_with(&format!("# {}", a.display())));
    assert_eq!(run.classified, vec![vec![1u8; 512]]);
    assert_eq!(run.stats.files, 2);
    assert_eq!(run.stats.bytes_accumulated, 800);
    assert_eq!(run.pending_after, 0);

    let whole = run_whole(&[&a, &b]);
    assert_eq!(whole, vec![vec![1u8; 700], vec![2u8; 100]]);
}

fn run_whole(inputs: &[&Path]) -> Vec<Vec<u8>> {
    run(DriverConfig::default(), inputs).unwrap().classified
}

#[test]
fn test_type_names_are_resolved() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "named.bin", &[3u8; 512]);

    let run = run(block_config(512), &[&path]).unwrap();
    assert_eq!(
        run.lines,
        vec![format!("{:<10} {} # {}", 0, "LOW", path.display())]
    );
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let good = write_file(&dir, "good.bin", &pattern(100));
    let missing = dir.path().join("missing.bin");

    let err = run(DriverConfig::default(), &[&missing, &good]).err().unwrap();
    assert!(matches!(err, ClassifyError::Open { .. }));
}

#[test]
fn test_invalid_config_rejected_by_driver() {
    let config = DriverConfig {
        block_size: 0,
        ..DriverConfig::default()
    };
    let reporter = Reporter::new(Vec::new(), Vec::new(), false);
    let err = Driver::new(config, Recording::default(), reporter).err().unwrap();
    assert!(matches!(err, ClassifyError::InvalidConfig { .. }));
}
