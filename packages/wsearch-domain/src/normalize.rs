use unicode_segmentation::UnicodeSegmentation;

const ELLIPSIS: &str = "...";

/// Canonical lookup key for a raw keyword: trimmed, lowercased, control characters removed
/// (including `\t`, `\n`, and `\r`), then remaining whitespace runs collapsed to a single space.
pub fn normalize_keyword(raw: &str) -> String {
	let lowered = raw.trim().to_lowercase();
	let mut out = String::with_capacity(lowered.len());
	let mut pending_space = false;

	for ch in lowered.chars() {
		// Control characters are dropped before whitespace folding, so `\t` joins its neighbors.
		if ch.is_control() {
			continue;
		}
		if ch.is_whitespace() {
			pending_space = true;

			continue;
		}
		if pending_space && !out.is_empty() {
			out.push(' ');
		}

		pending_space = false;

		out.push(ch);
	}

	out
}

/// Truncates on grapheme boundaries, replacing the tail with `...` when the text is longer than
/// `max_chars` graphemes.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
	let graphemes: Vec<&str> = text.graphemes(true).collect();

	if graphemes.len() <= max_chars {
		return text.to_string();
	}
	if max_chars <= ELLIPSIS.len() {
		return graphemes[..max_chars].concat();
	}

	let mut out = graphemes[..max_chars - ELLIPSIS.len()].concat();

	out.push_str(ELLIPSIS);

	out
}

/// Escapes `\`, `%`, and `_` so user input is matched literally inside a `LIKE ... ESCAPE '\'`
/// pattern.
pub fn escape_like(input: &str) -> String {
	let mut out = String::with_capacity(input.len());

	for ch in input.chars() {
		if matches!(ch, '\\' | '%' | '_') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}
