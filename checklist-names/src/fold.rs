//! ASCII folding of Latin script names and author strings

/// Replace accented Latin letters and common ligatures by their ASCII base
/// letters. Characters without a known mapping are kept as they are.
pub fn fold_to_ascii(x: &str) -> String {
    let mut out = String::with_capacity(x.len());
    for c in x.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        match c {
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => out.push('A'),
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => out.push('a'),
            'Æ' => out.push_str("AE"),
            'æ' => out.push_str("ae"),
            'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => out.push('C'),
            'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => out.push('c'),
            'Ð' | 'Ď' | 'Đ' => out.push('D'),
            'ð' | 'ď' | 'đ' => out.push('d'),
            'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => out.push('E'),
            'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => out.push('e'),
            'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => out.push('G'),
            'ĝ' | 'ğ' | 'ġ' | 'ģ' => out.push('g'),
            'Ĥ' | 'Ħ' => out.push('H'),
            'ĥ' | 'ħ' => out.push('h'),
            'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => out.push('I'),
            'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => out.push('i'),
            'Ĵ' => out.push('J'),
            'ĵ' => out.push('j'),
            'Ķ' => out.push('K'),
            'ķ' => out.push('k'),
            'Ĺ' | 'Ļ' | 'Ľ' | 'Ŀ' | 'Ł' => out.push('L'),
            'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => out.push('l'),
            'Ñ' | 'Ń' | 'Ņ' | 'Ň' => out.push('N'),
            'ñ' | 'ń' | 'ņ' | 'ň' => out.push('n'),
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => out.push('O'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => out.push('o'),
            'Œ' => out.push_str("OE"),
            'œ' => out.push_str("oe"),
            'Ŕ' | 'Ŗ' | 'Ř' => out.push('R'),
            'ŕ' | 'ŗ' | 'ř' => out.push('r'),
            'Ś' | 'Ŝ' | 'Ş' | 'Š' => out.push('S'),
            'ś' | 'ŝ' | 'ş' | 'š' => out.push('s'),
            'ß' => out.push_str("ss"),
            'Ţ' | 'Ť' | 'Ŧ' => out.push('T'),
            'ţ' | 'ť' | 'ŧ' => out.push('t'),
            'Þ' => out.push_str("TH"),
            'þ' => out.push_str("th"),
            'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => out.push('U'),
            'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => out.push('u'),
            'Ŵ' => out.push('W'),
            'ŵ' => out.push('w'),
            'Ý' | 'Ÿ' | 'Ŷ' => out.push('Y'),
            'ý' | 'ÿ' | 'ŷ' => out.push('y'),
            'Ź' | 'Ż' | 'Ž' => out.push('Z'),
            'ź' | 'ż' | 'ž' => out.push('z'),
            '×' => out.push('x'),
            '‘' | '’' | '´' | '`' => out.push('\''),
            '“' | '”' => out.push('"'),
            '–' | '—' => out.push('-'),
            _ => out.push(c),
        }
    }
    out
}
