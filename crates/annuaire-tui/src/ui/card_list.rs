//! Directory list pane — left panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::App;

/// Render the directory list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible_cards();
  let total = app.cards.len();

  // Title with counts and the active category selection.
  let category = match app.filter.category {
    Some(c) => format!(" [{}]", c.label()),
    None => String::new(),
  };
  let title = if app.filter_active || !app.filter.is_neutral() {
    format!(" Directory ({}/{}){category} ", visible.len(), total)
  } else {
    format!(" Directory ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  // Build list items.
  let items: Vec<ListItem> = visible
    .iter()
    .enumerate()
    .map(|(i, card)| {
      let is_cursor = i == app.list_cursor;

      let style = if is_cursor {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };

      // Membership badges: ● tracked in rolodex, ★ owned by the user.
      let mut badges = String::new();
      if card.is_in_rolodex {
        badges.push('●');
      }
      if card.is_mine {
        badges.push('★');
      }

      let mut spans = vec![
        Span::styled(format!("{:<12}", card.owner_category.label()), style),
        Span::styled(card.name.clone(), style),
      ];
      if !badges.is_empty() {
        spans.push(Span::styled(
          format!("  {badges}"),
          if is_cursor {
            style
          } else {
            Style::default().fg(Color::Yellow)
          },
        ));
      }

      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // If a query is active or set, show a filter bar at the bottom.
  if (app.filter_active || !app.filter.query.is_empty())
    && inner_area.height > 2
  {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter.query)
    } else {
      format!("/{}", app.filter.query)
    };
    let filter_style = Style::default().fg(Color::Yellow);
    f.render_widget(
      ratatui::widgets::Paragraph::new(filter_text).style(filter_style),
      filter_area,
    );
  }

  // Scrollable list with cursor tracking.
  let mut state = ListState::default();
  state.select(if visible.is_empty() {
    None
  } else {
    Some(app.list_cursor)
  });

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    inner_area,
    &mut state,
  );
}
