/// Split a deck body (frontmatter already removed) into raw slide texts.
///
/// A slide ends at:
/// 1. a `---` line with blank lines on both sides,
/// 2. three or more consecutive blank lines,
/// 3. a `# ` heading once the current slide has content.
///
/// Fenced code blocks are opaque: nothing inside them splits a slide.
pub fn split(body: &str) -> Vec<String> {
    let body = body.replace("\r\n", "\n");
    let lines: Vec<&str> = body.split('\n').collect();

    let mut chunks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut fence = Fence::default();
    let mut blank_run = 0;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if fence.update(trimmed) {
            blank_run = 0;
            current.push(line);
            i += 1;
            continue;
        }

        if is_dash_separator(trimmed) {
            let prev_blank = current.last().is_none_or(|l| l.trim().is_empty());
            let next_blank = lines.get(i + 1).is_none_or(|l| l.trim().is_empty());
            if prev_blank && next_blank {
                chunks.push(std::mem::take(&mut current));
                blank_run = 0;
                i += 1;
                continue;
            }
        }

        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run == 3 {
                chunks.push(std::mem::take(&mut current));
            } else if blank_run < 3 {
                current.push(line);
            }
        } else {
            blank_run = 0;
            current.push(line);
        }
        i += 1;
    }
    chunks.push(current);

    let mut slides = Vec::new();
    for chunk in chunks {
        split_on_headings(&chunk, &mut slides);
    }
    slides
}

/// Start a new slide at every top-level `# ` heading that follows content.
fn split_on_headings(lines: &[&str], slides: &mut Vec<String>) {
    let mut current: Vec<&str> = Vec::new();
    let mut has_content = false;
    let mut fence = Fence::default();

    for &line in lines {
        let in_fence = fence.update(line.trim());
        if !in_fence && line.starts_with("# ") && has_content {
            push_trimmed(&current, slides);
            current.clear();
            has_content = false;
        }
        if !line.trim().is_empty() {
            has_content = true;
        }
        current.push(line);
    }
    push_trimmed(&current, slides);
}

fn push_trimmed(lines: &[&str], slides: &mut Vec<String>) {
    let text = lines.join("\n").trim().to_string();
    if !text.is_empty() {
        slides.push(text);
    }
}

fn is_dash_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

/// Tracks whether we are inside a ``` or ~~~ fenced block.
#[derive(Default)]
struct Fence {
    open: Option<(char, usize)>,
}

impl Fence {
    /// Feed one trimmed line. Returns true when the line belongs to a fence
    /// (including the opening and closing markers).
    fn update(&mut self, trimmed: &str) -> bool {
        match self.open {
            Some((ch, len)) => {
                let run = trimmed.chars().take_while(|&c| c == ch).count();
                if run >= len && trimmed[run * ch.len_utf8()..].trim().is_empty() {
                    self.open = None;
                }
                true
            }
            None => {
                let ch = match trimmed.chars().next() {
                    Some(c @ ('`' | '~')) => c,
                    _ => return false,
                };
                let run = trimmed.chars().take_while(|&c| c == ch).count();
                if run >= 3 {
                    self.open = Some((ch, run));
                    true
                } else {
                    false
                }
            }
        }
    }
}
