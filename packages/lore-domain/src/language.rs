/// Languages the pipeline translates between. Anything else folds into
/// [`Language::English`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Language {
	Dutch,
	German,
	French,
	English,
	Spanish,
}
impl Language {
	/// English exonym, as used verbatim in translation instructions.
	pub fn name(self) -> &'static str {
		match self {
			Self::Dutch => "Dutch",
			Self::German => "German",
			Self::French => "French",
			Self::English => "English",
			Self::Spanish => "Spanish",
		}
	}
}

/// Classifies `text` into a supported language.
///
/// Fails closed: detection failure (empty or ambiguous input) and any
/// unsupported language both map to English. Deterministic for identical
/// input; no external calls.
pub fn detect(text: &str) -> Language {
	let Some(info) = whatlang::detect(text) else {
		return Language::English;
	};

	match info.lang() {
		whatlang::Lang::Nld => Language::Dutch,
		whatlang::Lang::Deu => Language::German,
		whatlang::Lang::Fra => Language::French,
		whatlang::Lang::Spa => Language::Spanish,
		_ => Language::English,
	}
}
