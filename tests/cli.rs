use assert_cmd::Command;
use image::{ImageBuffer, Rgb, RgbImage};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Black 3x3 with a pure green middle column.
fn write_fixture(dir: &Path) -> PathBuf {
    let img: RgbImage = ImageBuffer::from_fn(3, 3, |x, _| {
        if x == 1 {
            Rgb([0, 255, 0])
        } else {
            Rgb([0, 0, 0])
        }
    });
    let path = dir.join("input.png");
    img.save(&path).unwrap();
    path
}

fn run(dir: &TempDir, script: &str) -> assert_cmd::assert::Assert {
    let input = write_fixture(dir.path());
    Command::cargo_bin("seamedit")
        .unwrap()
        .arg(&input)
        .arg("--preview")
        .arg(dir.path().join("current.png"))
        .arg("--output")
        .arg(dir.path().join("final.png"))
        .write_stdin(script)
        .assert()
}

fn output(dir: &TempDir) -> RgbImage {
    image::open(dir.path().join("final.png")).unwrap().to_rgb8()
}

#[test]
fn removes_the_greenest_seam() {
    let dir = TempDir::new().unwrap();
    run(&dir, "g\ny\nq\n")
        .success()
        .stdout(predicate::str::contains("Remove the greenest seam. Continue? (Y/N)"))
        .stdout(predicate::str::contains("Thanks for playing."));

    let out = output(&dir);
    assert_eq!(out.dimensions(), (2, 3));
    assert!(out.pixels().all(|p| *p == Rgb([0, 0, 0])));
}

#[test]
fn declining_keeps_the_image() {
    let dir = TempDir::new().unwrap();
    run(&dir, "e n q").success();

    let out = output(&dir);
    assert_eq!(out.dimensions(), (3, 3));
    assert_eq!(*out.get_pixel(1, 1), Rgb([0, 255, 0]));
}

#[test]
fn undo_puts_the_seam_back() {
    let dir = TempDir::new().unwrap();
    run(&dir, "g y u y q")
        .success()
        .stdout(predicate::str::contains("You have 0 undo operations left."));

    let out = output(&dir);
    assert_eq!(out.dimensions(), (3, 3));
    assert_eq!(*out.get_pixel(1, 0), Rgb([0, 255, 0]));
}

#[test]
fn stops_at_one_column() {
    let dir = TempDir::new().unwrap();
    run(&dir, "g y g y g q")
        .success()
        .stdout(predicate::str::contains("not long enough"));
    assert_eq!(output(&dir).dimensions(), (1, 3));
}

#[test]
fn end_of_input_quits() {
    let dir = TempDir::new().unwrap();
    run(&dir, "x u")
        .success()
        .stdout(predicate::str::contains("That is not a valid option."));
    assert!(dir.path().join("current.png").exists());
    assert_eq!(output(&dir).dimensions(), (3, 3));
}

#[test]
fn missing_image_fails() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("seamedit")
        .unwrap()
        .arg(dir.path().join("nope.png"))
        .arg("--output")
        .arg(dir.path().join("final.png"))
        .write_stdin("q")
        .assert()
        .failure();
}
