use cardui::prelude::*;
use ratatui::style::{Color, Style};

fn main() -> anyhow::Result<()> {
    let style = CardStyle {
        container_error: Style::default().fg(Color::Red),
        placeholder_error: Some(Color::LightRed),
        ..CardStyle::default()
    };
    let options = UiOptions::default()
        .with_card_holder(true)
        .with_postal_code(true)
        .with_style(style);

    let card = CardUI::new(options).with_title("Checkout").run()?;
    println!("{}", serde_json::to_string_pretty(&card)?);
    Ok(())
}
