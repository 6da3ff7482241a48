use crate::{board::Tile, types::RowEntry};

use ratatui::prelude::*;
use std::{env, fs, process};

pub fn print_usage_and_exit() -> ! {
    eprintln!(
        "Usage: flapboard [-rows PATH] [-seed N]

Options:
  -rows PATH  Load board rows from a file of `id: text` lines
  -seed N     Seed the flicker randomness for a reproducible run
By default, the built-in three-row board is shown."
    );

    process::exit(1);
}

pub fn parse_args() -> (Vec<RowEntry>, Option<u64>) {
    let mut rows_path: Option<String> = None;
    let mut seed: Option<u64> = None;

    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => print_usage_and_exit(),

            "-r" | "-rows" | "--rows" => {
                let path = args.next().unwrap_or_else(|| {
                    eprintln!("Missing path after {}", arg);

                    print_usage_and_exit()
                });

                rows_path = Some(path);
            }

            "-s" | "-seed" | "--seed" => {
                let value = args.next().unwrap_or_else(|| {
                    eprintln!("Missing value after {}", arg);

                    print_usage_and_exit()
                });

                seed = Some(value.parse::<u64>().unwrap_or_else(|_| {
                    eprintln!("Invalid seed: {}", value);

                    print_usage_and_exit()
                }));
            }

            other => {
                eprintln!("Unknown argument: {}", other);

                print_usage_and_exit()
            }
        }
    }

    let rows = if let Some(path) = rows_path {
        load_rows_from_file(&path)
    } else {
        builtin_rows()
    };

    (rows, seed)
}

pub fn load_rows_from_file(path: &str) -> Vec<RowEntry> {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read rows file at {}: {}", path, e);

        process::exit(1);
    });

    parse_rows(&content)
}

pub fn parse_rows(content: &str) -> Vec<RowEntry> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (id, text) = line.split_once(':')?;

            Some(RowEntry {
                id: id.trim().to_string(),
                text: text.trim().to_string(),
            })
        })
        .collect()
}

pub fn builtin_rows() -> Vec<RowEntry> {
    vec![
        RowEntry {
            id: "location".to_string(),
            text: "CAMBRIDGE, MA".to_string(),
        },
        RowEntry {
            id: "email".to_string(),
            text: "HELLO@FLAPBOARD.DEV".to_string(),
        },
        RowEntry {
            id: "status".to_string(),
            text: "UNDERGRADUATE @ HARVARD".to_string(),
        },
    ]
}

/// First `width` characters of `text`, right-padded with spaces to `width`.
pub fn display_text(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let missing = width.saturating_sub(out.chars().count());
    out.push_str(&" ".repeat(missing));

    out
}

pub fn build_tile_lines(tiles: &[Tile]) -> Vec<Line<'static>> {
    vec![half_line(tiles, false), half_line(tiles, true)]
}

fn half_line(tiles: &[Tile], bottom: bool) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::with_capacity(tiles.len() * 2);

    for (i, tile) in tiles.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }

        let mut style = if tile.is_flipping() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        if bottom {
            style = style.add_modifier(Modifier::DIM);
        }

        spans.push(Span::styled(tile.shown().to_string(), style));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_text_pads_short_input_to_width() {
        let d = display_text("UNDERGRADUATE @ HARVARD", 25);

        assert_eq!(d.chars().count(), 25);
        assert_eq!(d, "UNDERGRADUATE @ HARVARD  ");
    }

    #[test]
    fn display_text_truncates_long_input_to_width() {
        let long = "X".repeat(40);

        assert_eq!(display_text(&long, 25), "X".repeat(25));
    }

    #[test]
    fn display_text_keeps_exact_width_input() {
        let exact: String = ('A'..='Y').collect();

        assert_eq!(exact.chars().count(), 25);
        assert_eq!(display_text(&exact, 25), exact);
    }

    #[test]
    fn parse_rows_reads_id_text_lines() {
        let content = "# departure board\nlocation: CAMBRIDGE, MA\n\nstatus: ON AIR\n";
        let rows = parse_rows(content);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "location");
        assert_eq!(rows[0].text, "CAMBRIDGE, MA");
        assert_eq!(rows[1].id, "status");
        assert_eq!(rows[1].text, "ON AIR");
    }

    #[test]
    fn parse_rows_keeps_colons_inside_the_text() {
        let rows = parse_rows("status: GATE: B12");

        assert_eq!(rows[0].text, "GATE: B12");
    }

    #[test]
    fn parse_rows_drops_lines_without_a_separator() {
        let rows = parse_rows("not a row\nstatus: OK");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "status");
    }

    #[test]
    fn tile_lines_render_one_glyph_per_tile() {
        let tiles = vec![Tile::new('H'), Tile::new('I')];
        let lines = build_tile_lines(&tiles);

        assert_eq!(lines.len(), 2);
        for line in &lines {
            let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            assert_eq!(text, "H I");
        }
    }
}
