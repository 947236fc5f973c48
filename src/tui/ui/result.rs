//! Risk assessment result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Assessment, RiskLabel};
use crate::tui::styles::MedicalTheme;

/// Outcome of the last prediction
#[derive(Debug, Clone)]
pub enum ResultState {
    Complete { assessment: Assessment },
    Error { message: String },
}

/// Render the result screen
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);
    match state {
        ResultState::Complete { assessment } => render_assessment(f, chunks[1], assessment),
        ResultState::Error { message } => render_error(f, chunks[1], message),
    }
    render_result_footer(f, chunks[2]);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Risk Assessment", MedicalTheme::title()),
        Span::styled(" │ Model Prediction", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_assessment(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let result = &assessment.result;
    let risk_style = MedicalTheme::risk_level(result.label);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", assessment.disorder.name),
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let probability_rows = result.probabilities.len() as u16 * 3;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),                 // Label + confidence
            Constraint::Length(probability_rows), // Class probabilities
            Constraint::Length(4),                 // Recommendation
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let risk_icon = match result.label {
        RiskLabel::Low => "OK",
        RiskLabel::Moderate | RiskLabel::High => "!",
    };

    let headline = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("Predicted Risk Level for {}: ", assessment.disorder.name),
                MedicalTheme::text_secondary(),
            ),
            Span::styled(
                format!("{risk_icon} {}", result.label),
                risk_style.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Risk Confidence: ", MedicalTheme::text_secondary()),
            Span::styled(format!("{:.2}%", result.confidence), MedicalTheme::text()),
        ]),
        Line::from(Span::styled(
            format!(
                "{} │ assessed {}",
                assessment.disorder.inheritance,
                assessment.created_at.format("%Y-%m-%d %H:%M UTC")
            ),
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(headline, chunks[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            result
                .probabilities
                .iter()
                .map(|_| Constraint::Length(3))
                .collect::<Vec<_>>(),
        )
        .split(chunks[1]);

    for ((label, probability), row) in result.probabilities.iter().zip(rows.iter()) {
        let percent = (probability * 100.0).clamp(0.0, 100.0);
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(Span::styled(
                        format!(" {} ", label.as_str()),
                        MedicalTheme::text_secondary(),
                    ))
                    .borders(Borders::ALL)
                    .border_style(MedicalTheme::border()),
            )
            .gauge_style(MedicalTheme::risk_level(*label))
            .percent(percent.round() as u16)
            .label(format!("{percent:.1}%"));
        f.render_widget(gauge, *row);
    }

    let recommendation = Paragraph::new(vec![
        Line::from(Span::styled("Recommended Steps:", MedicalTheme::subtitle())),
        Line::from(Span::styled(result.label.recommendation(), risk_style)),
    ])
    .wrap(Wrap { trim: true });
    f.render_widget(recommendation, chunks[2]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Prediction failed", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_result_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[Enter/Esc] ", MedicalTheme::key_hint()),
        Span::styled("Back to Form ", MedicalTheme::key_desc()),
        Span::styled("[N] ", MedicalTheme::key_hint()),
        Span::styled("New Assessment ", MedicalTheme::key_desc()),
        Span::styled("[Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiseaseCatalog, PredictionResult};
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(state: &ResultState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("terminal");
        terminal
            .draw(|f| render_result(f, f.area(), state))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_label_confidence_and_advice() {
        let disorder = DiseaseCatalog
            .entry("Autosomal Recessive Disorders", "Cystic Fibrosis")
            .expect("disorder exists");
        let result = PredictionResult::new(
            RiskLabel::Low,
            vec![
                (RiskLabel::High, 0.1),
                (RiskLabel::Low, 0.75),
                (RiskLabel::Moderate, 0.15),
            ],
        );
        let state = ResultState::Complete {
            assessment: Assessment::new(disorder, result),
        };

        let screen = rendered(&state);
        assert!(screen.contains("Predicted Risk Level for Cystic Fibrosis"));
        assert!(screen.contains("LOW"));
        assert!(screen.contains("75.00%"));
        assert!(screen.contains("Maintain regular check-ups"));
    }

    #[test]
    fn test_renders_error_panel() {
        let state = ResultState::Error {
            message: "Model error: shape mismatch".into(),
        };
        let screen = rendered(&state);
        assert!(screen.contains("Prediction failed"));
        assert!(screen.contains("shape mismatch"));
    }
}
