//! Card detail pane — right panel.

use annuaire_core::card::UserInfo;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(detail) = &app.detail else {
    return;
  };
  let card = &detail.card;

  let block = Block::default()
    .title(format!(" {} ", card.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = Vec::new();

  lines.push(field("owner", &card.owner_name));
  lines.push(field("category", card.owner_category.label()));
  if let Some(matriculation) = &card.matriculation {
    lines.push(field("matricule", matriculation));
  }

  // Membership line.
  let membership = if card.is_mine {
    Span::styled("★ your card", Style::default().fg(Color::Yellow))
  } else if card.is_in_rolodex {
    Span::styled(
      "● in your rolodex — press r to remove",
      Style::default().fg(Color::Yellow),
    )
  } else {
    Span::styled(
      "press r to add to your rolodex",
      Style::default().fg(Color::DarkGray),
    )
  };
  lines.push(Line::from(""));
  lines.push(Line::from(membership));

  if let Some(info) = &detail.user_info {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      "Contact",
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    )));
    lines.extend(contact_lines(info));
  }

  let scroll_offset = app.detail_scroll as u16;
  let para = Paragraph::new(lines).scroll((scroll_offset, 0));
  f.render_widget(para, inner);
}

// ─── Formatting helpers ───────────────────────────────────────────────────────

fn field(label: &str, value: &str) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<12}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(value.to_owned()),
  ])
}

/// One line per present contact field; absent fields are skipped.
fn contact_lines(info: &UserInfo) -> Vec<Line<'static>> {
  let mut lines = Vec::new();

  let mut push = |label: &'static str, value: &Option<String>| {
    if let Some(v) = value {
      lines.push(field(label, v));
    }
  };

  push("name", &info.name);
  push("email", &info.email);
  push("phone", &info.phone);
  push("address", &info.address);

  // City and postal code share a line when both are present.
  let locality = match (&info.city, &info.postal_code) {
    (Some(city), Some(code)) => Some(format!("{code} {city}")),
    (Some(city), None) => Some(city.clone()),
    (None, Some(code)) => Some(code.clone()),
    (None, None) => None,
  };
  if let Some(l) = locality {
    lines.push(field("city", &l));
  }

  if let Some(country) = &info.country {
    lines.push(field("country", country));
  }

  lines
}
