/// Read an integer the lenient way the input format allows: an optional sign
/// followed by at least one leading digit. Anything after the digits is
/// ignored, so `"12abc"` reads as 12 and `"3.7"` as 3. Values outside `i64`
/// are treated as non-numeric.
pub(crate) fn parse_int_prefix(token: &str) -> Option<i64> {
    let sign = match token.as_bytes().first()? {
        b'-' | b'+' => 1,
        _ => 0,
    };
    let end = token[sign..]
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(token.len() - sign);
    if end == 0 {
        return None;
    }
    token[..sign + end].parse().ok()
}

/// Forward-only reader over whitespace-separated tokens.
#[derive(Debug)]
pub(crate) struct TokenCursor<'a> {
    tokens: Vec<&'a str>,
    position: usize,
}

impl<'a> TokenCursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_whitespace().collect(),
            position: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Move the cursor to an absolute token index.
    pub(crate) fn seek(&mut self, index: usize) {
        self.position = index;
    }

    /// Take the next token. The cursor advances even past the end, matching
    /// the reader's "consume then check" behaviour on truncated pairs.
    pub(crate) fn next_token(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.position).copied();
        self.position += 1;
        token
    }

    pub(crate) fn next_int(&mut self) -> Option<i64> {
        self.next_token().and_then(parse_int_prefix)
    }
}
