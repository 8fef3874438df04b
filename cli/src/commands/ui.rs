use console::Style;
use imagerie_agent::Recommendation;

const WIDTH: usize = 80;

pub fn print_header(title: &str) {
    println!("\n{}", Style::new().bold().cyan().apply_to(title));
    println!(
        "{}",
        Style::new().dim().apply_to("─".repeat(console::measure_text_width(title)))
    );
}

pub fn print_success(msg: &str) {
    println!("{} {}", Style::new().green().bold().apply_to("OK:"), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", Style::new().red().bold().apply_to("ERREUR:"), msg);
}

pub fn print_panel(title: &str, content: &str, border_color: Style) {
    let padding = WIDTH.saturating_sub(console::measure_text_width(title) + 5);

    println!(
        "{} {} {}",
        border_color.apply_to("┌─"),
        Style::new().bold().apply_to(title),
        border_color.apply_to(format!("{}┐", "─".repeat(padding)))
    );
    for line in content.lines() {
        for wrapped in textwrap::wrap(line, WIDTH - 4) {
            let space = (WIDTH - 4).saturating_sub(console::measure_text_width(&wrapped));
            println!(
                "{} {}{} {}",
                border_color.apply_to("│"),
                wrapped,
                " ".repeat(space),
                border_color.apply_to("│")
            );
        }
    }
    println!("{}", border_color.apply_to(format!("└{}┘", "─".repeat(WIDTH - 2))));
}

pub fn print_questions(questions: &[String]) {
    print_panel("Pour préciser", &questions.join("\n"), Style::new().yellow());
    if questions.len() > 1 {
        println!(
            "{}",
            Style::new()
                .dim()
                .apply_to("Répondez dans l'ordre, séparé par '|', ',' ou ';'.")
        );
    }
}

pub fn print_recommendation(recommendation: &Recommendation) {
    let mut body = recommendation.text.clone();
    if !recommendation.notes.is_empty() {
        body.push_str("\n\n");
        body.push_str(&imagerie_core::decision::render_notes(&recommendation.notes));
    }
    print_panel("Recommandation", &body, Style::new().green());
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "{}: {}",
        Style::new().dim().apply_to(key),
        Style::new().bold().apply_to(value)
    );
}

/// Print `prompt` and read one line from stdin. `None` on end of input.
pub fn read_line(prompt: &str) -> std::io::Result<Option<String>> {
    use std::io::Write;

    print!("{}", Style::new().bold().apply_to(prompt));
    std::io::stdout().flush()?;
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
