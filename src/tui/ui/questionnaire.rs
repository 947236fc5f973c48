//! Questionnaire form: disorder selection plus family and pregnancy history.

use std::collections::BTreeSet;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use crate::adapters::Verification;
use crate::domain::questionnaire::{
    DEFAULT_FATHER_AGE, DEFAULT_MOTHER_AGE, MAX_PREVIOUS_ABORTIONS,
};
use crate::domain::{
    BirthDefects, Choice, DiseaseCatalog, DisorderEntry, FolicAcid, Gender, Grandparent,
    PregnancyHistory, QuestionnaireResponse, YesNo,
};
use crate::tui::styles::MedicalTheme;

const MAX_AGE_DIGITS: usize = 5;

/// Form fields, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    Disorder,
    MotherAffected,
    FatherAffected,
    Grandparents,
    Gender,
    BirthDefects,
    FolicAcid,
    MotherAge,
    FatherAge,
    MaternalIllness,
    RadiationExposure,
    SubstanceAbuse,
    AssistedConception,
    PreviousAnomalies,
    PreviousAbortions,
}

impl Field {
    pub const ALL: [Field; 16] = [
        Self::Category,
        Self::Disorder,
        Self::MotherAffected,
        Self::FatherAffected,
        Self::Grandparents,
        Self::Gender,
        Self::BirthDefects,
        Self::FolicAcid,
        Self::MotherAge,
        Self::FatherAge,
        Self::MaternalIllness,
        Self::RadiationExposure,
        Self::SubstanceAbuse,
        Self::AssistedConception,
        Self::PreviousAnomalies,
        Self::PreviousAbortions,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "Disorder category",
            Self::Disorder => "Specific disorder",
            Self::MotherAffected => "Does mother have this disorder?",
            Self::FatherAffected => "Does father have this disorder?",
            Self::Grandparents => "Grandparents who had this disorder",
            Self::Gender => "Gender of child",
            Self::BirthDefects => "Observed any birth defects?",
            Self::FolicAcid => "Folic acid taken during conception?",
            Self::MotherAge => "Mother's age",
            Self::FatherAge => "Father's age",
            Self::MaternalIllness => "History of serious maternal illness?",
            Self::RadiationExposure => "Radiation exposure during pregnancy?",
            Self::SubstanceAbuse => "Substance abuse during pregnancy?",
            Self::AssistedConception => "Was IVF/ART used?",
            Self::PreviousAnomalies => "History of anomalies in past pregnancies?",
            Self::PreviousAbortions => "Number of previous abortions",
        }
    }

    fn section(self) -> Option<&'static str> {
        match self {
            Self::Category => Some("Genetic disorder"),
            Self::MotherAffected => Some("Family medical history"),
            Self::Gender => Some("Child information"),
            Self::MotherAge => Some("Pregnancy history"),
            _ => None,
        }
    }
}

fn cycle<T: Choice>(current: T, forward: bool) -> T {
    let options = T::OPTIONS;
    let pos = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward {
        (pos + 1) % options.len()
    } else {
        (pos + options.len() - 1) % options.len()
    };
    options[next]
}

/// Questionnaire form state
pub struct QuestionnaireFormState {
    pub selected_field: usize,
    category_idx: usize,
    disorder_idx: usize,
    mother_affected: YesNo,
    father_affected: YesNo,
    grandparents: BTreeSet<Grandparent>,
    grandparent_cursor: usize,
    gender: Gender,
    birth_defects: BirthDefects,
    folic_acid: FolicAcid,
    mother_age: String,
    father_age: String,
    pregnancy: PregnancyHistory,
    previous_abortions: u8,
    pub error_message: Option<String>,
}

impl Default for QuestionnaireFormState {
    fn default() -> Self {
        let response = QuestionnaireResponse::default();
        Self {
            selected_field: 0,
            category_idx: 0,
            disorder_idx: 0,
            mother_affected: response.mother_affected,
            father_affected: response.father_affected,
            grandparents: response.grandparents,
            grandparent_cursor: 0,
            gender: response.gender,
            birth_defects: response.birth_defects,
            folic_acid: response.folic_acid,
            mother_age: format!("{DEFAULT_MOTHER_AGE}"),
            father_age: format!("{DEFAULT_FATHER_AGE}"),
            pregnancy: response.pregnancy,
            previous_abortions: response.previous_abortions,
            error_message: None,
        }
    }
}

impl QuestionnaireFormState {
    #[must_use]
    pub fn field(&self) -> Field {
        Field::ALL[self.selected_field % Field::ALL.len()]
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % Field::ALL.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = Field::ALL.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Category name currently selected.
    #[must_use]
    pub fn category(&self) -> &'static str {
        let categories = DiseaseCatalog.categories();
        categories[self.category_idx % categories.len()].name
    }

    /// Disorder currently selected, if the category lists any.
    #[must_use]
    pub fn disorder(&self) -> Option<&'static DisorderEntry> {
        let disorders = DiseaseCatalog.disorders(self.category());
        disorders.get(self.disorder_idx)
    }

    /// Change the focused selection (left/right).
    ///
    /// Select fields cycle through their options, the abortion count moves
    /// by one within its bounds, and the grandparent list moves its cursor.
    pub fn change(&mut self, forward: bool) {
        self.error_message = None;
        match self.field() {
            Field::Category => {
                let n = DiseaseCatalog.categories().len();
                self.category_idx = if forward {
                    (self.category_idx + 1) % n
                } else {
                    (self.category_idx + n - 1) % n
                };
                // Disorder list depends on the category.
                self.disorder_idx = 0;
            }
            Field::Disorder => {
                let n = DiseaseCatalog.disorders(self.category()).len();
                if n > 0 {
                    self.disorder_idx = if forward {
                        (self.disorder_idx + 1) % n
                    } else {
                        (self.disorder_idx + n - 1) % n
                    };
                }
            }
            Field::MotherAffected => self.mother_affected = cycle(self.mother_affected, forward),
            Field::FatherAffected => self.father_affected = cycle(self.father_affected, forward),
            Field::Grandparents => {
                let n = Grandparent::OPTIONS.len();
                self.grandparent_cursor = if forward {
                    (self.grandparent_cursor + 1) % n
                } else {
                    (self.grandparent_cursor + n - 1) % n
                };
            }
            Field::Gender => self.gender = cycle(self.gender, forward),
            Field::BirthDefects => self.birth_defects = cycle(self.birth_defects, forward),
            Field::FolicAcid => self.folic_acid = cycle(self.folic_acid, forward),
            Field::MaternalIllness => {
                let flag = &mut self.pregnancy.serious_maternal_illness;
                *flag = cycle(*flag, forward);
            }
            Field::RadiationExposure => {
                let flag = &mut self.pregnancy.radiation_exposure;
                *flag = cycle(*flag, forward);
            }
            Field::SubstanceAbuse => {
                let flag = &mut self.pregnancy.substance_abuse;
                *flag = cycle(*flag, forward);
            }
            Field::AssistedConception => {
                let flag = &mut self.pregnancy.assisted_conception;
                *flag = cycle(*flag, forward);
            }
            Field::PreviousAnomalies => {
                let flag = &mut self.pregnancy.previous_anomalies;
                *flag = cycle(*flag, forward);
            }
            Field::PreviousAbortions => {
                self.previous_abortions = if forward {
                    (self.previous_abortions + 1).min(MAX_PREVIOUS_ABORTIONS)
                } else {
                    self.previous_abortions.saturating_sub(1)
                };
            }
            Field::MotherAge | Field::FatherAge => {}
        }
    }

    /// Toggle the grandparent under the cursor.
    pub fn toggle(&mut self) {
        if self.field() != Field::Grandparents {
            return;
        }
        let grandparent = Grandparent::OPTIONS[self.grandparent_cursor % Grandparent::OPTIONS.len()];
        if !self.grandparents.remove(&grandparent) {
            self.grandparents.insert(grandparent);
        }
    }

    fn age_buffer(&mut self) -> Option<&mut String> {
        match self.field() {
            Field::MotherAge => Some(&mut self.mother_age),
            Field::FatherAge => Some(&mut self.father_age),
            _ => None,
        }
    }

    /// Add a character to the focused age field
    pub fn input_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || c == '.') {
            return;
        }
        if let Some(buffer) = self.age_buffer() {
            if buffer.len() < MAX_AGE_DIGITS {
                buffer.push(c);
            }
            self.error_message = None;
        }
    }

    /// Delete the last character of the focused age field
    pub fn delete_char(&mut self) {
        if let Some(buffer) = self.age_buffer() {
            buffer.pop();
        }
    }

    /// Wipe the answers and start over.
    pub fn reset(&mut self) {
        self.mother_age.zeroize();
        self.father_age.zeroize();
        self.grandparents.clear();
        *self = Self::default();
    }

    /// Load the sample case: Cystic Fibrosis with no family history.
    pub fn load_sample_data(&mut self) {
        *self = Self::default();
        let catalog = DiseaseCatalog;
        if let Some(idx) = catalog
            .categories()
            .iter()
            .position(|c| c.name == "Autosomal Recessive Disorders")
        {
            self.category_idx = idx;
            self.disorder_idx = catalog.categories()[idx]
                .disorders
                .iter()
                .position(|d| d.name == "Cystic Fibrosis")
                .unwrap_or(0);
        }
        self.folic_acid = FolicAcid::Yes;
    }

    /// Build the questionnaire response from the form.
    ///
    /// # Errors
    /// Returns a message naming the field if an age is not a number.
    pub fn to_response(&self) -> Result<QuestionnaireResponse, String> {
        let parse_age = |label: &str, value: &str| -> Result<f64, String> {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("{label}: Invalid number"))
        };

        Ok(QuestionnaireResponse {
            mother_age: parse_age(Field::MotherAge.label(), &self.mother_age)?,
            father_age: parse_age(Field::FatherAge.label(), &self.father_age)?,
            birth_defects: self.birth_defects,
            gender: self.gender,
            grandparents: self.grandparents.clone(),
            mother_affected: self.mother_affected,
            father_affected: self.father_affected,
            folic_acid: self.folic_acid,
            pregnancy: self.pregnancy,
            previous_abortions: self.previous_abortions,
        })
    }

    fn display_value(&self, field: Field) -> String {
        match field {
            Field::Category => self.category().to_string(),
            Field::Disorder => self.disorder().map(|d| d.name).unwrap_or("-").to_string(),
            Field::MotherAffected => self.mother_affected.to_string(),
            Field::FatherAffected => self.father_affected.to_string(),
            Field::Grandparents => {
                if self.grandparents.is_empty() {
                    "none".to_string()
                } else {
                    self.grandparents
                        .iter()
                        .map(Choice::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                }
            }
            Field::Gender => self.gender.to_string(),
            Field::BirthDefects => self.birth_defects.to_string(),
            Field::FolicAcid => self.folic_acid.to_string(),
            Field::MotherAge => self.mother_age.clone(),
            Field::FatherAge => self.father_age.clone(),
            Field::MaternalIllness => self.pregnancy.serious_maternal_illness.to_string(),
            Field::RadiationExposure => self.pregnancy.radiation_exposure.to_string(),
            Field::SubstanceAbuse => self.pregnancy.substance_abuse.to_string(),
            Field::AssistedConception => self.pregnancy.assisted_conception.to_string(),
            Field::PreviousAnomalies => self.pregnancy.previous_anomalies.to_string(),
            Field::PreviousAbortions => {
                let filled = usize::from(self.previous_abortions);
                let empty = usize::from(MAX_PREVIOUS_ABORTIONS) - filled;
                format!("{}{} {}", "■".repeat(filled), "□".repeat(empty), filled)
            }
        }
    }
}

/// Render the questionnaire form
pub fn render_questionnaire(
    f: &mut Frame,
    area: Rect,
    state: &QuestionnaireFormState,
    verification: Verification,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form + info
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], verification);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    render_form_fields(f, body[0], state);
    render_disorder_info(f, body[1], state.disorder());
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, verification: Verification) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Genetic Disease Risk Predictor", MedicalTheme::title()),
        Span::styled(
            format!(" │ model artifacts {verification}"),
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &QuestionnaireFormState) {
    let mut lines = Vec::new();

    for (i, field) in Field::ALL.iter().copied().enumerate() {
        if let Some(section) = field.section() {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(section, MedicalTheme::subtitle())));
        }

        let is_selected = i == state.selected_field;
        let label_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let mut spans = vec![
            Span::styled(if is_selected { "▶ " } else { "  " }, label_style),
            Span::styled(format!("{:<44}", field.label()), label_style),
        ];

        if field == Field::Grandparents && is_selected {
            for (j, grandparent) in Grandparent::OPTIONS.iter().enumerate() {
                let mark = if state.grandparents.contains(grandparent) {
                    "[x]"
                } else {
                    "[ ]"
                };
                let style = if j == state.grandparent_cursor {
                    MedicalTheme::selected()
                } else {
                    MedicalTheme::text()
                };
                spans.push(Span::styled(format!("{mark} {grandparent}"), style));
                spans.push(Span::raw(" "));
            }
        } else {
            let value_style = if is_selected {
                MedicalTheme::selected()
            } else {
                MedicalTheme::text()
            };
            spans.push(Span::styled(
                format!(" {} ", state.display_value(field)),
                value_style,
            ));
        }

        lines.push(Line::from(spans));
    }

    let form = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(" Questionnaire ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border_focused()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(form, area);
}

fn render_disorder_info(f: &mut Frame, area: Rect, disorder: Option<&DisorderEntry>) {
    let mut lines = Vec::new();

    if let Some(entry) = disorder {
        lines.push(Line::from(Span::styled(entry.name, MedicalTheme::title())));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Inheritance Type: ", MedicalTheme::text_secondary()),
            Span::styled(entry.inheritance.to_string(), MedicalTheme::info()),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Common Symptoms:",
            MedicalTheme::text_secondary(),
        )));
        for symptom in entry.symptoms {
            lines.push(Line::from(vec![
                Span::styled(" • ", MedicalTheme::info()),
                Span::styled(*symptom, MedicalTheme::text()),
            ]));
        }
    }

    let info = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(" Disorder ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(info, area);
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &QuestionnaireFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        let mut hints = vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled("Change ", MedicalTheme::key_desc()),
        ];
        if state.field() == Field::Grandparents {
            hints.push(Span::styled("[Space] ", MedicalTheme::key_hint()));
            hints.push(Span::styled("Toggle ", MedicalTheme::key_desc()));
        }
        hints.extend([
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Predict Risk ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Sample ", MedicalTheme::key_desc()),
            Span::styled("[Ctrl+Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]);
        Line::from(hints)
    };

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

    fn focus(state: &mut QuestionnaireFormState, field: Field) {
        state.selected_field = Field::ALL
            .iter()
            .position(|f| *f == field)
            .expect("field listed");
    }

    #[test]
    fn test_default_form_matches_default_response() {
        let state = QuestionnaireFormState::default();
        let response = state.to_response().expect("defaults parse");
        assert_eq!(response, QuestionnaireResponse::default());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = QuestionnaireFormState::default();
        state.prev_field();
        assert_eq!(state.field(), Field::PreviousAbortions);
        state.next_field();
        assert_eq!(state.field(), Field::Category);
    }

    #[test]
    fn test_category_change_resets_disorder() {
        let mut state = QuestionnaireFormState::default();
        focus(&mut state, Field::Disorder);
        state.change(true);
        assert_eq!(state.disorder_idx, 1);

        focus(&mut state, Field::Category);
        state.change(true);
        assert_eq!(state.category(), "Autosomal Recessive Disorders");
        assert_eq!(state.disorder().map(|d| d.name), Some("Cystic Fibrosis"));
    }

    #[test]
    fn test_grandparent_toggle() {
        let mut state = QuestionnaireFormState::default();
        focus(&mut state, Field::Grandparents);
        state.toggle();
        state.change(true);
        state.change(true);
        state.change(true);
        state.toggle();

        let response = state.to_response().expect("valid");
        let expected: BTreeSet<_> = [
            Grandparent::MaternalGrandmother,
            Grandparent::PaternalGrandfather,
        ]
        .into_iter()
        .collect();
        assert_eq!(response.grandparents, expected);

        // Toggling again removes it.
        state.toggle();
        let response = state.to_response().expect("valid");
        assert!(!response.grandparents.contains(&Grandparent::PaternalGrandfather));
    }

    #[test]
    fn test_abortion_slider_is_bounded() {
        let mut state = QuestionnaireFormState::default();
        focus(&mut state, Field::PreviousAbortions);
        state.change(false);
        assert_eq!(state.previous_abortions, 0);
        for _ in 0..10 {
            state.change(true);
        }
        assert_eq!(state.previous_abortions, MAX_PREVIOUS_ABORTIONS);
    }

    #[test]
    fn test_age_editing() {
        let mut state = QuestionnaireFormState::default();
        focus(&mut state, Field::MotherAge);
        state.delete_char();
        state.delete_char();
        for c in "41x".chars() {
            state.input_char(c);
        }
        let response = state.to_response().expect("valid");
        assert_eq!(response.mother_age, 41.0);

        // Characters go nowhere when a select field is focused.
        focus(&mut state, Field::Gender);
        state.input_char('7');
        assert_eq!(state.to_response().expect("valid").mother_age, 41.0);

        focus(&mut state, Field::FatherAge);
        while !state.father_age.is_empty() {
            state.delete_char();
        }
        let err = state.to_response().expect_err("empty age");
        assert!(err.starts_with("Father's age"));
    }

    #[test]
    fn test_sample_is_cystic_fibrosis() {
        let mut state = QuestionnaireFormState::default();
        state.load_sample_data();
        let disorder = state.disorder().expect("sample disorder");
        assert_eq!(disorder.name, "Cystic Fibrosis");
        assert_eq!(state.folic_acid, FolicAcid::Yes);
        assert!(state.to_response().expect("valid").validate().is_ok());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = QuestionnaireFormState::default();
        state.load_sample_data();
        focus(&mut state, Field::Grandparents);
        state.toggle();
        state.reset();
        assert_eq!(state.selected_field, 0);
        assert_eq!(
            state.to_response().expect("valid"),
            QuestionnaireResponse::default()
        );
    }
}
