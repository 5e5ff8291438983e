const DNS_HEADER_LEN: usize = 12;
const MAX_POINTER_DEPTH: usize = 10;

/// Query names from the question section of a DNS message.
pub fn parse_dns_queries(message: &[u8]) -> Result<Vec<String>, &'static str> {
    if message.len() < DNS_HEADER_LEN {
        return Err("DNS message too short");
    }

    let qdcount = u16::from_be_bytes([message[4], message[5]]);
    let mut queries = Vec::with_capacity(qdcount as usize);
    let mut offset = DNS_HEADER_LEN;

    for _ in 0..qdcount {
        let (name, next) = parse_name(message, offset, 0)?;
        queries.push(name);

        // QTYPE + QCLASS
        offset = next + 4;
        if offset > message.len() {
            break;
        }
    }

    Ok(queries)
}

/// Returns the name at `offset` and the offset just past it, following
/// compression pointers up to `MAX_POINTER_DEPTH` deep.
fn parse_name(message: &[u8], offset: usize, depth: usize) -> Result<(String, usize), &'static str> {
    if depth > MAX_POINTER_DEPTH {
        return Err("too many DNS compression pointers");
    }

    let mut labels: Vec<String> = Vec::new();
    let mut pos = offset;

    loop {
        let len = *message.get(pos).ok_or("DNS name runs past message")? as usize;
        pos += 1;

        if len == 0 {
            return Ok((labels.join("."), pos));
        }

        if len & 0xC0 == 0xC0 {
            let low = *message.get(pos).ok_or("incomplete DNS compression pointer")? as usize;
            pos += 1;

            let target = ((len & 0x3F) << 8) | low;
            if target >= message.len() {
                return Err("DNS compression pointer out of bounds");
            }

            let (suffix, _) = parse_name(message, target, depth + 1)?;
            if !suffix.is_empty() {
                labels.push(suffix);
            }
            return Ok((labels.join("."), pos));
        }

        let label = message.get(pos..pos + len).ok_or("DNS label exceeds message")?;
        labels.push(String::from_utf8_lossy(label).into_owned());
        pos += len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(qdcount: u16) -> Vec<u8> {
        let mut msg = vec![0xab, 0xcd, 0x01, 0x00];
        msg.extend_from_slice(&qdcount.to_be_bytes());
        msg.extend_from_slice(&[0u8; 6]);
        msg
    }

    #[test]
    fn test_single_query() {
        let mut msg = header(1);
        msg.extend_from_slice(b"\x03www\x04rust\x04lang\x00\x00\x01\x00\x01");
        assert_eq!(parse_dns_queries(&msg).unwrap(), vec!["www.rust.lang".to_string()]);
    }

    #[test]
    fn test_compression_pointer() {
        let mut msg = header(2);
        msg.extend_from_slice(b"\x07example\x03com\x00\x00\x01\x00\x01");
        // "mail" + pointer to offset 12 ("example.com")
        msg.extend_from_slice(b"\x04mail\xc0\x0c\x00\x01\x00\x01");
        assert_eq!(
            parse_dns_queries(&msg).unwrap(),
            vec!["example.com".to_string(), "mail.example.com".to_string()]
        );
    }

    #[test]
    fn test_pointer_loop_is_rejected() {
        let mut msg = header(1);
        msg.extend_from_slice(&[0xc0, 0x0c]);
        assert!(parse_dns_queries(&msg).is_err());
    }

    #[test]
    fn test_short_message() {
        assert!(parse_dns_queries(&[0u8; 11]).is_err());
    }
}
