use chemsect::{Document, Element};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(document: &Document, show_metrics: bool, color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{}",
        palette.bold(palette.paint(
            format!("⚙  Segmenting as {} ({} bytes)", document.mode(), document.text().len()),
            ansi::CYAN
        ))
    );

    println!("\n{}", palette.paint("━━━ Elements ━━━", ansi::GRAY));
    for element in document.elements() {
        print_element(element, &palette);
    }

    let warnings = document.warnings();
    if !warnings.is_empty() {
        println!("\n{}", palette.paint("━━━ Warnings ━━━", ansi::GRAY));
        for warning in warnings {
            println!("  {}", palette.paint(format!("⚠ {warning}"), ansi::YELLOW));
        }
    }

    if show_metrics {
        println!("\n{}", palette.paint("━━━ Pass metrics ━━━", ansi::GRAY));
        for pass in &document.metrics().passes {
            println!(
                "  {:<40} {:>5} matched  {:>5} spans  {}",
                pass.subtype,
                pass.matched,
                pass.spans_scanned,
                palette.dim(format!("{:?}", pass.duration)),
            );
        }
        println!("  {}", palette.dim(format!("total: {:?}", document.metrics().total)));
    }

    let blocks = document.blocks().count();
    let unknown = document.unknown().count();
    println!(
        "\n{}",
        palette.paint(
            format!(
                "{} elements: {} blocks ({} unrecognized), {} spacers",
                document.elements().len(),
                blocks,
                unknown,
                document.elements().len() - blocks,
            ),
            ansi::GREEN
        )
    );
}

fn print_element(element: &Element, palette: &ansi::Palette) {
    let lines = element.line_span();
    let location = format!("{:>5}-{:<5}", lines.start, lines.end);
    let name = element.readable_name();
    let preview: String = preview_of(element.raw(), 48);
    println!(
        "  {} {:<7} {:<36} {}",
        palette.dim(location),
        element.kind().name(),
        palette.bold(name),
        palette.dim(preview),
    );
}

fn preview_of(raw: &str, max_chars: usize) -> String {
    let one_line = raw.trim_end().replace('\n', "␤");
    let preview: String = one_line.chars().take(max_chars).collect();
    if one_line.chars().count() > max_chars { format!("{preview}…") } else { preview }
}
