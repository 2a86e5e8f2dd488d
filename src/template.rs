//! Replacement template expansion: $0, $N, ${N}, $name, ${name}, $$.

/// Append the expansion of `template` for one match to `dst`. `m` is the
/// flat submatch index list and `names` the capture names with index 0
/// for the whole match. A `$` that heads no valid reference stays
/// literal; references to groups that did not participate expand to
/// nothing.
pub(crate) fn expand(
    dst: &mut Vec<u8>,
    template: &[u8],
    src: &[u8],
    m: &[isize],
    names: &[Box<str>],
) {
    let mut template = template;
    while let Some(i) = template.iter().position(|&b| b == b'$') {
        dst.extend_from_slice(&template[..i]);
        template = &template[i..];
        if template.len() > 1 && template[1] == b'$' {
            dst.push(b'$');
            template = &template[2..];
            continue;
        }
        let Some((name, num, rest)) = extract(template) else {
            dst.push(b'$');
            template = &template[1..];
            continue;
        };
        template = rest;
        if let Some(num) = num {
            if num < m.len() / 2 && m[2 * num] >= 0 {
                dst.extend_from_slice(&src[m[2 * num] as usize..m[2 * num + 1] as usize]);
            }
        } else {
            for (i, group_name) in names.iter().enumerate() {
                if group_name.as_ref() == name && i < m.len() / 2 && m[2 * i] >= 0 {
                    dst.extend_from_slice(&src[m[2 * i] as usize..m[2 * i + 1] as usize]);
                    break;
                }
            }
        }
    }
    dst.extend_from_slice(template);
}

/// Parse `$name` or `${name}` at the front of `template`, which starts
/// with '$'. \return the name, its numeric value when it is all digits,
/// and the remaining template.
fn extract(template: &[u8]) -> Option<(&str, Option<usize>, &[u8])> {
    let mut body = &template[1..];
    let braced = body.first() == Some(&b'{');
    if braced {
        body = &body[1..];
    }
    let mut end = 0;
    while end < body.len() && (body[end].is_ascii_alphanumeric() || body[end] == b'_') {
        end += 1;
    }
    if end == 0 {
        return None;
    }
    let name = std::str::from_utf8(&body[..end]).ok()?;
    let mut rest = &body[end..];
    if braced {
        if rest.first() != Some(&b'}') {
            return None;
        }
        rest = &rest[1..];
    }
    let num = if name.bytes().all(|b| b.is_ascii_digit()) {
        name.parse::<usize>().ok()
    } else {
        None
    };
    Some((name, num, rest))
}
