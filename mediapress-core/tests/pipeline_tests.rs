// mediapress-core/tests/pipeline_tests.rs
//
// End-to-end pipeline scenarios over a real temp-directory vault, with the
// engine replaced by the mock spawner.

use ffmpeg_sidecar::event::FfmpegEvent;
use mediapress_core::external::mocks::{MockFfmpegSpawner, MockProber};
use mediapress_core::external::StreamReport;
use mediapress_core::notifications::mocks::RecordingReporter;
use mediapress_core::{
    naming, process_assets, rollback_assets, FsVault, MediaKind, Settings, ToolPaths,
};
use std::fs;
use std::path::{Path, PathBuf};

fn fake_tools() -> ToolPaths {
    ToolPaths {
        ffmpeg: PathBuf::from("ffmpeg"),
        ffprobe: PathBuf::from("ffprobe"),
    }
}

fn write_file(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn file_names(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn happy_path_replaces_the_original_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "notes/photo.png", b"png bytes");

    let vault = FsVault::open(dir.path()).unwrap();
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("photo.webp", true);
    let prober = MockProber::new();
    let reporter = RecordingReporter::new();
    let settings = Settings::default();

    let outcomes = process_assets(
        &vault,
        &spawner,
        &prober,
        &reporter,
        &settings,
        &fake_tools(),
    )
    .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].file_name, "photo.png");
    assert_eq!(outcomes[0].output_name, "photo.webp");
    assert_eq!(outcomes[0].kind, MediaKind::Image);

    // Exactly one output, no original, no leftover temp file
    assert_eq!(file_names(dir.path()), vec!["photo.webp"]);

    // Unambiguous extensions never reach the prober
    assert!(prober.probed_paths().is_empty());

    let notices = reporter.notices();
    assert!(notices
        .iter()
        .any(|m| m == "Found 1 files to convert of type image"));
    assert!(notices
        .iter()
        .any(|m| m == "Found 0 files to convert of type video"));
    assert!(reporter
        .updates()
        .iter()
        .any(|m| m == "Processing file 1/1 (photo)"));
}

#[test]
fn overwrite_disabled_gives_the_output_a_unique_suffix() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "photo.png", b"png bytes");

    let vault = FsVault::open(dir.path()).unwrap();
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(".webp", true);
    let prober = MockProber::new();
    let reporter = RecordingReporter::new();

    let mut settings = Settings::default();
    settings.overwrite = false;
    settings.unique_id_length = 6;

    process_assets(
        &vault,
        &spawner,
        &prober,
        &reporter,
        &settings,
        &fake_tools(),
    )
    .unwrap();

    let names = file_names(dir.path());
    assert_eq!(names.len(), 1, "original replaced, not duplicated: {names:?}");

    let name = &names[0];
    let suffix = name
        .strip_prefix("photo_")
        .and_then(|rest| rest.strip_suffix(".webp"))
        .unwrap_or_else(|| panic!("unexpected output name {name}"));
    assert_eq!(suffix.len(), 6);
    assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn first_failure_aborts_the_rest_of_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.png", b"a");
    write_file(dir.path(), "b.png", b"b");
    write_file(dir.path(), "c.png", b"c");

    let vault = FsVault::open(dir.path()).unwrap();
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("a.webp", true);
    spawner.add_exit_error_expectation(
        "b.webp",
        vec![FfmpegEvent::Error("Simulated engine failure".to_string())],
        1,
    );
    let prober = MockProber::new();
    let reporter = RecordingReporter::new();
    let settings = Settings::default();

    let outcomes = process_assets(
        &vault,
        &spawner,
        &prober,
        &reporter,
        &settings,
        &fake_tools(),
    )
    .unwrap();

    // a converted, b failed in flight, c untouched
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].file_name, "a.png");

    assert!(dir.path().join("a.webp").exists());
    assert!(!dir.path().join("a.png").exists());

    assert!(!dir.path().join("b.png").exists(), "b was already evicted");
    assert!(!dir.path().join("b.webp").exists(), "b produced no output");

    assert!(dir.path().join("c.png").exists(), "c must stay untouched");
    assert!(!dir.path().join("c.webp").exists());

    // The in-flight file left a decodable staging copy behind
    let temp_names: Vec<String> = file_names(dir.path())
        .into_iter()
        .filter(|n| n.ends_with(".tmp"))
        .collect();
    assert_eq!(temp_names.len(), 1);
    let stem = temp_names[0].strip_suffix(".tmp").unwrap();
    let decoded = naming::decode_temp_name(stem).unwrap();
    assert_eq!(decoded.stem, "b");
    assert_eq!(decoded.extension, "png");

    assert!(reporter
        .notices()
        .iter()
        .any(|m| m.contains("error occurred while converting") && m.contains("b.png")));
}

#[test]
fn rollback_restores_the_staged_original() {
    let dir = tempfile::tempdir().unwrap();
    // A prior run crashed after staging: the temp copy holds the real bytes,
    // and a stale file sits at the destination.
    write_file(dir.path(), "report_pdf_aB3dK9.tmp", b"staged original");
    write_file(dir.path(), "report.pdf", b"stale leftover");

    let vault = FsVault::open(dir.path()).unwrap();
    let reporter = RecordingReporter::new();
    let settings = Settings::default();

    let restored = rollback_assets(&vault, &reporter, &settings).unwrap();
    assert_eq!(restored, 1);

    assert_eq!(file_names(dir.path()), vec!["report.pdf"]);
    assert_eq!(
        fs::read(dir.path().join("report.pdf")).unwrap(),
        b"staged original"
    );

    assert!(reporter
        .notices()
        .iter()
        .any(|m| m == "Found 1 temporary files to restore"));
}

#[test]
fn rollback_honors_a_disabled_overwrite_flag() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "report_pdf_aB3dK9.tmp", b"staged original");

    let vault = FsVault::open(dir.path()).unwrap();
    let reporter = RecordingReporter::new();
    let mut settings = Settings::default();
    settings.overwrite = false;

    let restored = rollback_assets(&vault, &reporter, &settings).unwrap();
    assert_eq!(restored, 1);
    assert_eq!(file_names(dir.path()), vec!["report_aB3dK9.pdf"]);
}

#[test]
fn audio_only_webm_is_converted_as_audio() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "clip.webm", b"webm bytes");

    let vault = FsVault::open(dir.path()).unwrap();
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("clip.webm", true);

    let prober = MockProber::new();
    prober.expect_report(
        &vault.root().join("clip.webm"),
        StreamReport {
            has_video: false,
            has_audio: true,
        },
    );

    let reporter = RecordingReporter::new();
    let mut settings = Settings::default();
    settings.video.include_webm = true;
    settings.audio.include_webm = true;

    let outcomes = process_assets(
        &vault,
        &spawner,
        &prober,
        &reporter,
        &settings,
        &fake_tools(),
    )
    .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].kind, MediaKind::Audio);

    // Probed once by the video loader, once by the audio loader; never
    // converted as video.
    assert_eq!(prober.probed_paths().len(), 2);
    let calls = spawner.get_received_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].iter().any(|a| a == "-b:a"));
    assert!(!calls[0].iter().any(|a| a == "-b:v"));

    assert_eq!(file_names(dir.path()), vec!["clip.webm"]);
}
