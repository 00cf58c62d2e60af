use crate::app_state::{App, FormItem, InputMode};
use crate::form::catalog::PLACEHOLDER_LABEL;
use crate::form::CUSTOM_ISOTOPE;
use crate::page::{ControlId, TABLE_HEADER};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, List, ListItem, Paragraph, Row,
        Table,
    },
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 顶部标题栏
            Constraint::Min(0),    // 表单 + 结果
            Constraint::Length(9), // 命令/日志
        ])
        .split(f.size());

    render_top_bar(f, chunks[0], app);

    let middle_chunks = Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([Constraint::Length(48), Constraint::Min(0)])
        .split(chunks[1]);

    render_form(f, middle_chunks[0], app);
    render_results(f, middle_chunks[1], app);
    render_bottom_bar(f, chunks[2], app);
}

fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let title = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan));

    let status = match app.guard.pending_kind() {
        Some(kind) => format!(" - 请求中: {:?}", kind),
        None => String::new(),
    };
    let title_text = Line::from(vec![
        Span::styled(
            " Radioactive Decay Simulator ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" - Terminal TUI{}", status)),
    ]);

    let paragraph = Paragraph::new(title_text)
        .block(title)
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(paragraph, area);
}

fn isotope_label(app: &App) -> String {
    if app.form.isotope.is_empty() {
        return PLACEHOLDER_LABEL.to_string();
    }
    app.catalog
        .select_options()
        .into_iter()
        .find(|(value, _)| *value == app.form.isotope)
        .map(|(_, label)| label)
        .unwrap_or_else(|| app.form.isotope.clone())
}

/// 表单条目的显示文本；禁用状态由调用方着色
fn item_line(app: &App, item: FormItem) -> (String, bool) {
    match item {
        FormItem::Isotope => (
            format!("Isotope: ◂ {} ▸", isotope_label(app)),
            app.page.isotope_select_enabled,
        ),
        FormItem::Text(field) => {
            let value = app.form.text(field);
            let cursor = if app.input_mode == InputMode::Editing(field) {
                "_"
            } else {
                ""
            };
            (format!("{}: [{}{}]", field.label(), value, cursor), true)
        }
        FormItem::HalfLifeUnit => (
            format!("Half-life unit: ◂ {} ▸", app.form.custom_half_life_unit.label()),
            true,
        ),
        FormItem::SettingsToggle => (format!("[ {} ]", app.page.settings_label()), true),
        FormItem::Checkbox(i) => {
            let cb = &app.form.checkboxes[i];
            let mark = if cb.checked { "x" } else { " " };
            (format!("[{}] {}", mark, cb.name), true)
        }
        FormItem::Datasets => {
            let slots = app.page.datasets.slots();
            let label = slots
                .get(app.page.datasets.selected_index())
                .map(|s| s.label())
                .unwrap_or_default();
            (
                format!("Dataset ({}): ◂ {} ▸", app.page.datasets.dataset_count(), label),
                slots.len() > 1,
            )
        }
        FormItem::Button(id) => {
            let control = app.page.control(id);
            let enabled = match id {
                ControlId::SaveImage | ControlId::SaveJson => {
                    control.is_enabled() && app.page.results_visible
                }
                _ => control.is_enabled(),
            };
            (format!("< {} >", control.label()), enabled)
        }
        FormItem::DataPointsToggle => (
            format!("[ {} ]", app.page.data_points_label()),
            app.page.results_visible,
        ),
    }
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focused_item();
    let items: Vec<ListItem> = app
        .form_items()
        .into_iter()
        .map(|item| {
            let (text, enabled) = item_line(app, item);
            let style = if Some(item) == focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD)
            } else if !enabled {
                Style::default().fg(Color::DarkGray)
            } else if matches!(item, FormItem::Button(_)) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let title = if app.form.isotope == CUSTOM_ISOTOPE {
        "表单 - Custom Isotope (↑↓ 导航, Enter 编辑/确认)"
    } else {
        "表单 (↑↓ 导航, ←→ 选择, Enter 编辑/确认)"
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(list, area);
}

fn render_results(f: &mut Frame, area: Rect, app: &App) {
    let banner_height = if app.page.banners.is_empty() {
        0
    } else {
        app.page.banners.len() as u16 + 2
    };
    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([Constraint::Length(banner_height), Constraint::Min(0)])
        .split(area);

    if banner_height > 0 {
        let lines: Vec<Line> = app
            .page
            .banners
            .iter()
            .map(|b| Line::from(Span::styled(b.message.as_str(), Style::default().fg(Color::Red))))
            .collect();
        let banners = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("错误")
                .style(Style::default().fg(Color::Red)),
        );
        f.render_widget(banners, chunks[0]);
    }

    let body = chunks[1];
    if !app.page.results_visible {
        let hint = Paragraph::new(vec![
            Line::from("还没有模拟结果"),
            Line::from("选择同位素后按 r 运行，或输入检索词后按 s 检索"),
        ])
        .block(Block::default().borders(Borders::ALL).title("结果"));
        f.render_widget(hint, body);
        return;
    }

    if app.page.data_points_visible {
        let halves = Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(body);
        render_chart(f, halves[0], app);
        render_table(f, halves[1], app);
    } else {
        render_chart(f, body, app);
    }
}

/// 表格单元格是后端格式化后的字符串，无法解析的点跳过
fn series(app: &App, column: usize) -> Vec<(f64, f64)> {
    app.page
        .table
        .iter()
        .filter_map(|row| {
            let x = row[0].trim().parse::<f64>().ok()?;
            let y = row[column].trim().parse::<f64>().ok()?;
            Some((x, y))
        })
        .collect()
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let remaining = series(app, 1);
    let decayed = series(app, 2);

    let x_max = remaining
        .iter()
        .chain(decayed.iter())
        .map(|(x, _)| *x)
        .fold(0.0_f64, f64::max);
    let y_max = remaining
        .iter()
        .chain(decayed.iter())
        .map(|(_, y)| *y)
        .fold(0.0_f64, f64::max);

    let datasets = vec![
        Dataset::default()
            .name("Remaining")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&remaining),
        Dataset::default()
            .name("Decayed")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&decayed),
    ];

    let plot_size = app.page.plot_src().map(|src| src.len()).unwrap_or(0);
    let title = format!(
        "Decay of {} (plot: {} 字节 data URI, i 保存图片)",
        app.page.selected_isotope_display, plot_size
    );
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .title("Time")
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![Span::raw("0"), Span::raw(format!("{:.0}", x_max))]),
        )
        .y_axis(
            Axis::default()
                .title("Amount")
                .bounds([0.0, y_max.max(1.0)])
                .labels(vec![Span::raw("0"), Span::raw(format!("{:.0}", y_max))]),
        );
    f.render_widget(chart, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(TABLE_HEADER.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let rows = app
        .page
        .table
        .iter()
        .map(|cells| Row::new(cells.iter().map(|c| Cell::from(c.as_str()))));
    let table = Table::new(rows, [Constraint::Ratio(1, 5); 5])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Data Points ({})", app.page.table.len())),
        );
    f.render_widget(table, area);
}

fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App) {
    let bottom_chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let command_prompt = match app.input_mode {
        InputMode::Command => {
            let mut spans = vec![Span::styled(
                "命令: ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )];
            let cur = app.command_cursor.min(app.command_input.len());
            let (left, right) = app.command_input.split_at(cur);
            spans.push(Span::raw(left));
            spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(right));

            // 补全建议显示为浅灰色
            if let Some(hint) = app.get_completion_hint() {
                spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
            }
            Line::from(spans)
        }
        InputMode::Editing(field) => Line::from(vec![
            Span::styled("编辑: ", Style::default().fg(Color::Green)),
            Span::raw(format!("{} (Enter/Esc 完成)", field.label())),
        ]),
        InputMode::Normal => Line::from(
            "/命令 r运行 s检索 i存图 j存JSON a高级设置 p数据点 ↑↓导航 Enter确认 q退出",
        ),
    };
    let command_paragraph = Paragraph::new(command_prompt).block(
        Block::default()
            .borders(Borders::ALL)
            .title(if app.input_mode == InputMode::Command {
                "命令输入模式"
            } else {
                "命令输入"
            })
            .style(if app.input_mode == InputMode::Command {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            }),
    );
    f.render_widget(command_paragraph, bottom_chunks[0]);

    let log_items: Vec<ListItem> = app
        .log_messages
        .iter()
        .rev()
        .take(20)
        .map(|msg| {
            let style = if msg.starts_with('✓') {
                Style::default().fg(Color::Green)
            } else if msg.starts_with('✗') {
                Style::default().fg(Color::Red)
            } else if msg.starts_with('⚠') {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(msg.as_str()).style(style)
        })
        .collect();

    let log = List::new(log_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("日志 (共 {} 条)", app.log_messages.len()))
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(log, bottom_chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::IsotopeCatalog;
    use crate::session::dto::SimulationResult;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::json;
    use std::time::Instant;
    use tokio::sync::mpsc;

    fn app() -> App {
        let (cmd_tx, _cmd_rx) = mpsc::unbounded_channel();
        let (_evt_tx, evt_rx) = mpsc::unbounded_channel();
        App::new(
            Vec::new(),
            IsotopeCatalog::builtin(),
            std::env::temp_dir(),
            cmd_tx,
            evt_rx,
        )
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .iter()
            .map(|c| c.symbol())
            .collect::<Vec<_>>()
            .join("")
    }

    #[test]
    fn idle_form_shows_controls() {
        let text = screen(&app());
        assert!(text.contains("Select an isotope"));
        assert!(text.contains("Run Simulation"));
        assert!(text.contains("Show Advanced Settings"));
    }

    #[test]
    fn banners_and_table_are_drawn() {
        let mut app = app();
        let result: SimulationResult = serde_json::from_value(json!({
            "plot": "AAAA",
            "data": [
                { "time": "0.00", "remaining": "100.00", "decayed": "0.00", "rate": "1.00", "gamma": "0" },
                { "time": "1.00", "remaining": "50.00", "decayed": "50.00", "rate": "0.50", "gamma": "3" }
            ]
        }))
        .unwrap();
        app.page.render_result(&result, "Cobalt-60");
        app.page.toggle_data_points();
        app.page.show_error("Please select an isotope.", Instant::now());

        let text = screen(&app);
        assert!(text.contains("Decay of Cobalt-60"));
        assert!(text.contains("Data Points (2)"));
        assert!(text.contains("Remaining"));
        assert!(text.contains("Please select an isotope."));
        assert!(text.contains("Hide Data Points"));
    }
}
