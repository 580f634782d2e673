// Copyright 2023 Remi Bernotavicius

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("recipe name can't be empty")]
    EmptyName,
    #[error("a recipe named {0:?} already exists")]
    DuplicateName(String),
}

/// One step of a recipe. `step` is 1-based and always matches the position in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub step: i32,
    pub body: String,
}

pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// The form a recipe name is compared in: case and runs of whitespace don't matter.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Checks a name about to be saved against the names of every *other* recipe, returning the
/// trimmed name to store.
pub fn validate_name<'a>(
    name: &str,
    others: impl IntoIterator<Item = &'a str>,
) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let normalized = normalize_name(trimmed);
    if let Some(existing) = others.into_iter().find(|o| normalize_name(o) == normalized) {
        return Err(ValidationError::DuplicateName(existing.into()));
    }
    Ok(trimmed.into())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub prep_time: String,
    pub cook_time: String,
    pub comments: String,
    pub image_path: Option<String>,
    pub ingredients: Vec<String>,
    instructions: Vec<Instruction>,
    pub categories: Vec<String>,
}

impl RecipeDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    fn renumber(&mut self) {
        for (i, instruction) in self.instructions.iter_mut().enumerate() {
            instruction.step = i as i32 + 1;
        }
    }

    pub fn set_ingredients_text(&mut self, text: &str) {
        self.ingredients = parse_lines(text);
    }

    pub fn ingredients_text(&self) -> String {
        self.ingredients.join("\n")
    }

    pub fn set_instructions_text(&mut self, text: &str) {
        self.instructions.clear();
        for body in parse_lines(text) {
            self.push_instruction(body);
        }
    }

    pub fn instructions_text(&self) -> String {
        self.instructions
            .iter()
            .map(|i| i.body.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn push_instruction(&mut self, body: impl Into<String>) {
        let at = self.instructions.len();
        self.insert_instruction(at, body);
    }

    /// Inserts before the instruction currently at `at` (0-based); past the end appends.
    pub fn insert_instruction(&mut self, at: usize, body: impl Into<String>) {
        let at = at.min(self.instructions.len());
        self.instructions.insert(
            at,
            Instruction {
                step: 0,
                body: body.into(),
            },
        );
        self.renumber();
    }

    pub fn remove_instruction(&mut self, at: usize) -> Option<Instruction> {
        if at >= self.instructions.len() {
            return None;
        }
        let mut removed = self.instructions.remove(at);
        self.renumber();
        removed.step = 0;
        Some(removed)
    }

    pub fn move_instruction(&mut self, from: usize, to: usize) -> bool {
        let len = self.instructions.len();
        if from >= len || to >= len {
            return false;
        }
        let instruction = self.instructions.remove(from);
        self.instructions.insert(to, instruction);
        self.renumber();
        true
    }

    pub fn add_category(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() && !self.categories.iter().any(|c| c == name) {
            self.categories.push(name.into());
        }
    }

    pub fn remove_category(&mut self, name: &str) {
        self.categories.retain(|c| c != name);
    }
}

#[cfg(test)]
fn steps(draft: &RecipeDraft) -> Vec<(i32, &str)> {
    draft
        .instructions()
        .iter()
        .map(|i| (i.step, i.body.as_str()))
        .collect()
}

#[test]
fn parse_lines_trims_and_skips_blanks() {
    assert_eq!(
        parse_lines("  2 eggs \n\n\tflour\r\n   \nmilk"),
        vec!["2 eggs", "flour", "milk"]
    );
    assert!(parse_lines("").is_empty());
}

#[test]
fn instructions_stay_contiguous() {
    let mut draft = RecipeDraft::new("Pancakes");
    draft.set_instructions_text("mix\nrest\nfry");
    assert_eq!(steps(&draft), vec![(1, "mix"), (2, "rest"), (3, "fry")]);

    draft.insert_instruction(0, "weigh");
    assert_eq!(
        steps(&draft),
        vec![(1, "weigh"), (2, "mix"), (3, "rest"), (4, "fry")]
    );

    let removed = draft.remove_instruction(2).unwrap();
    assert_eq!(removed.body, "rest");
    assert_eq!(steps(&draft), vec![(1, "weigh"), (2, "mix"), (3, "fry")]);

    assert!(draft.move_instruction(2, 0));
    assert_eq!(steps(&draft), vec![(1, "fry"), (2, "weigh"), (3, "mix")]);

    draft.insert_instruction(99, "serve");
    assert_eq!(steps(&draft).last(), Some(&(4, "serve")));

    assert!(draft.remove_instruction(4).is_none());
    assert!(!draft.move_instruction(0, 4));
    assert_eq!(draft.instructions_text(), "fry\nweigh\nmix\nserve");
}

#[test]
fn categories_are_unique_within_a_draft() {
    let mut draft = RecipeDraft::new("Toast");
    draft.add_category("Breakfast");
    draft.add_category(" Breakfast ");
    draft.add_category("");
    draft.add_category("Easy");
    assert_eq!(draft.categories, vec!["Breakfast", "Easy"]);

    draft.remove_category("Breakfast");
    assert_eq!(draft.categories, vec!["Easy"]);
}

#[test]
fn name_validation() {
    let existing = ["Tomato Soup", "Toast"];

    assert_eq!(
        validate_name("  Grilled Cheese ", existing),
        Ok("Grilled Cheese".into())
    );
    assert_eq!(validate_name("   ", existing), Err(ValidationError::EmptyName));
    assert_eq!(
        validate_name("tomato   soup", existing),
        Err(ValidationError::DuplicateName("Tomato Soup".into()))
    );
    assert_eq!(
        validate_name(" TOAST", existing),
        Err(ValidationError::DuplicateName("Toast".into()))
    );
}
