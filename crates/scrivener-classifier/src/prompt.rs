//! Prompt construction for inference-backed tagging

use scrivener_domain::CategorySet;

/// Builds the classification prompt sent to the inference backend
pub struct PromptBuilder<'a> {
    title: &'a str,
    content: &'a str,
    categories: &'a CategorySet,
    max_tags: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(title: &'a str, content: &'a str, categories: &'a CategorySet) -> Self {
        Self {
            title,
            content,
            categories,
            max_tags: 3,
        }
    }

    /// Upper bound on tags requested from the model
    pub fn with_max_tags(mut self, max_tags: usize) -> Self {
        self.max_tags = max_tags.max(1);
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let names = self.categories.names();
        let list = names.join(", ");

        let mut prompt = String::new();
        prompt.push_str(&format!(
            "Analyze the following note and assign the most appropriate tags from this list: {}\n\n",
            list
        ));
        prompt.push_str(&format!("Note Title: \"{}\"\n", self.title));
        prompt.push_str(&format!("Note Content: \"{}\"\n\n", self.content));

        prompt.push_str("Instructions:\n");
        prompt.push_str(&format!("- Only use tags from this exact list: {}\n", list));
        prompt.push_str(&format!(
            "- Choose 1-{} most relevant tags, most relevant first\n",
            self.max_tags
        ));
        prompt.push_str("- Respond with ONLY a JSON array of tag names, nothing else\n");
        if let Some(examples) = Self::examples(&names) {
            prompt.push_str(&format!("- Examples: {}\n", examples));
        }
        prompt.push_str("\nTags:");

        prompt
    }

    fn examples(names: &[&str]) -> Option<String> {
        match names {
            [] => None,
            [only] => Some(format!("[\"{}\"]", only)),
            [first, second, ..] => Some(format!(
                "[\"{}\"] or [\"{}\", \"{}\"]",
                first, first, second
            )),
        }
    }
}
