//! HTML escaping for interpolated text.

use std::borrow::Cow;

/// Escapes `& < > " '` so that `text` can be interpolated into element content and quoted attribute values.
///
/// Borrows `text` unchanged if there is nothing to escape.
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
	let first = match text.find(|c| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
		Some(first) => first,
		None => return Cow::Borrowed(text),
	};

	let mut escaped = String::with_capacity(text.len() + 16);
	escaped.push_str(&text[..first]);
	for c in text[first..].chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			c => escaped.push(c),
		}
	}
	Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
	use super::escape;
	use std::borrow::Cow;

	#[test]
	fn plain_text_is_borrowed() {
		assert!(matches!(escape("Hello table!"), Cow::Borrowed("Hello table!")));
	}

	#[test]
	fn markup_is_escaped() {
		assert_eq!(escape(r#"<a href="x">Tom & 'Jerry'</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
	}
}
