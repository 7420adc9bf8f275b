use env_logger::Env;
use failure::{err_msg, Error};
use log::info;
use seamedit::{Editor, PixelGrid, SeamError, Valuation};
use std::io::{self, BufRead};

extern crate clap;
extern crate image;

use clap::{App, Arg};

fn print_menu() {
    println!("Please enter a command");
    println!("g - Remove the greenest seam");
    println!("e - Remove the seam with the lowest energy");
    println!("u - Undo previous edit");
    println!("q - Quit");
}

fn save(editor: &Editor, path: &str) -> Result<(), Error> {
    editor.grid().to_image().save(path)?;
    Ok(())
}

// Anything but a "y" is a no, and so is running out of input.
fn confirm<I>(tokens: &mut I, question: &str) -> bool
where
    I: Iterator<Item = String>,
{
    println!("{} Continue? (Y/N)", question);
    tokens.next().map_or(false, |t| t.eq_ignore_ascii_case("y"))
}

// Highlight, show, ask, and then either remove the seam or take the
// highlight back.
fn carve<I>(editor: &mut Editor, valuation: Valuation, tokens: &mut I, preview: &str) -> Result<(), Error>
where
    I: Iterator<Item = String>,
{
    match editor.highlight(valuation) {
        Err(SeamError::TooNarrow { .. }) => {
            println!("[ERROR] Image width not long enough for more operations");
            return Ok(());
        }
        other => other?,
    }
    save(editor, preview)?;
    println!("[INFO] Highlighted {} seam", valuation.describe());

    let question = format!("Remove the {} seam.", valuation.describe());
    if confirm(tokens, &question) {
        editor.remove_highlighted()?;
        println!("[INFO] Removed highlighted seam");
    } else {
        editor.undo()?;
    }
    save(editor, preview)
}

fn undo<I>(editor: &mut Editor, tokens: &mut I, preview: &str) -> Result<(), Error>
where
    I: Iterator<Item = String>,
{
    if !confirm(tokens, "Undo.") {
        return Ok(());
    }
    if editor.undo()? {
        save(editor, preview)?;
        println!("[INFO] You have {} undo operations left.", editor.undo_depth());
    } else {
        println!("[INFO] You have no more operations to undo");
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let matches = App::new("seamedit")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Interactive seam carving with undo")
        .arg(
            Arg::with_name("image")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("preview")
                .help("Where the image is written after every edit")
                .short("p")
                .long("preview")
                .takes_value(true)
                .default_value("current.png"),
        )
        .arg(
            Arg::with_name("output")
                .help("Where the final image is written on quit")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value("final.png"),
        )
        .get_matches();

    let arg = |name: &str| {
        matches
            .value_of(name)
            .map(String::from)
            .ok_or_else(|| err_msg(format!("missing argument: {}", name)))
    };
    let (input, preview, output) = (arg("image")?, arg("preview")?, arg("output")?);

    let grid = PixelGrid::from_image(&image::open(&input)?)?;
    info!("loaded {} ({}x{})", input, grid.width(), grid.height());
    let mut editor = Editor::new(grid);
    save(&editor, &preview)?;

    let stdin = io::stdin();
    let mut tokens = stdin
        .lock()
        .lines()
        .map_while(Result::ok)
        .flat_map(|line| {
            line.split_whitespace()
                .map(String::from)
                .collect::<Vec<_>>()
        });

    loop {
        print_menu();
        let choice = match tokens.next() {
            Some(choice) => choice.to_lowercase(),
            None => break,
        };
        match choice.as_str() {
            "g" => carve(&mut editor, Valuation::Greenest, &mut tokens, &preview)?,
            "e" => carve(&mut editor, Valuation::LowestEnergy, &mut tokens, &preview)?,
            "u" => undo(&mut editor, &mut tokens, &preview)?,
            "q" => break,
            _ => println!("That is not a valid option."),
        }
    }

    println!("Thanks for playing.");
    save(&editor, &output)?;
    info!(
        "wrote {} ({}x{})",
        output,
        editor.grid().width(),
        editor.grid().height()
    );
    Ok(())
}
