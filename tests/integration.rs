//! End-to-end tests of the companion binary.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

mod tokenize {
    use super::*;

    fn tokens(command: &str) -> Vec<String> {
        let output = cargo_bin_cmd!("ffmpeg-harness")
            .arg("tokenize")
            .arg(command)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn test_splits_on_spaces() {
        assert_eq!(
            tokens("-i input.mp4 -c:v copy output.mp4"),
            vec!["-i", "input.mp4", "-c:v", "copy", "output.mp4"]
        );
    }

    #[test]
    fn test_collapses_repeated_spaces() {
        assert_eq!(tokens("-i   input.mp4"), vec!["-i", "input.mp4"]);
    }

    #[test]
    fn test_quoted_argument_keeps_spaces() {
        assert_eq!(
            tokens("-vf \"drawtext=text='My File'\" out.mp4"),
            vec!["-vf", "drawtext=text='My File'", "out.mp4"]
        );
    }

    #[test]
    fn test_single_quoted_argument() {
        assert_eq!(
            tokens("-metadata title='Symphony No.9 in D' out.mp3"),
            vec!["-metadata", "title=Symphony No.9 in D", "out.mp3"]
        );
    }

    #[test]
    fn test_empty_command_produces_empty_array() {
        let output = cargo_bin_cmd!("ffmpeg-harness")
            .arg("tokenize")
            .arg("   ")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        assert_eq!(String::from_utf8(output).unwrap().trim(), "[]");
    }
}

mod probe {
    use super::*;

    const BANNER: &str = concat!(
        "Input #0, mp3, from 'song.mp3':\n",
        "  Metadata:\n",
        "    artist          : Beethoven\n",
        "  Duration: 00:03:33.24, start: 0.000000, bitrate: 320 kb/s\n",
        "    Stream #0:0: Audio: mp3, 48000 Hz, stereo, fltp, 320 kb/s\n",
    );

    #[test]
    fn test_decodes_banner_to_json() {
        cargo_bin_cmd!("ffmpeg-harness")
            .arg("probe")
            .write_stdin(BANNER)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"format\": \"mp3\""))
            .stdout(predicate::str::contains("\"duration\": 213240"))
            .stdout(predicate::str::contains("\"sample_rate\": 48000"));
    }

    #[test]
    fn test_empty_input_still_produces_json() {
        cargo_bin_cmd!("ffmpeg-harness")
            .arg("probe")
            .write_stdin("")
            .assert()
            .success()
            .stdout(predicate::str::contains("raw_information"));
    }
}

mod usage {
    use super::*;

    #[test]
    fn test_no_arguments() {
        cargo_bin_cmd!("ffmpeg-harness")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("usage"));
    }

    #[test]
    fn test_unknown_subcommand() {
        cargo_bin_cmd!("ffmpeg-harness")
            .arg("transcode")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("usage"));
    }

    #[test]
    fn test_tokenize_without_command() {
        cargo_bin_cmd!("ffmpeg-harness")
            .arg("tokenize")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("usage"));
    }
}
