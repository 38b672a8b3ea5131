use super::*;

#[test]
fn test_identity_inliner_returns_input() {
    let html = "<style>p { color: red; }</style><p>x</p>";
    assert_eq!(IdentityInliner.inline(html), html);
}

#[test]
fn test_hoists_tag_class_and_id_rules() {
    let html = concat!(
        "<style>p { color: red; } .note { font-size: 12px } #main { margin: 0; }</style>",
        "<div id=\"main\"><p class=\"note\">Hi</p></div>"
    );
    let output = StyleHoistingInliner.inline(html);

    assert_eq!(
        output,
        "<div id=\"main\" style=\"margin: 0\"><p class=\"note\" style=\"color: red; font-size: 12px\">Hi</p></div>"
    );
}

#[test]
fn test_specificity_order_and_existing_style_last() {
    let html = concat!(
        "<style>#x { color: green } .y { color: blue } a { color: red }</style>",
        "<a id=\"x\" class=\"y\" style=\"color: black;\">link</a>"
    );
    let output = StyleHoistingInliner.inline(html);

    assert_eq!(
        output,
        "<a id=\"x\" class=\"y\" style=\"color: red; color: blue; color: green; color: black\">link</a>"
    );
}

#[test]
fn test_comma_separated_selectors() {
    let html = "<style>h1, h2 { margin: 0 }</style><h1>A</h1><h2>B</h2><h3>C</h3>";
    let output = StyleHoistingInliner.inline(html);
    assert_eq!(
        output,
        "<h1 style=\"margin: 0\">A</h1><h2 style=\"margin: 0\">B</h2><h3>C</h3>"
    );
}

#[test]
fn test_complex_selectors_and_at_rules_are_dropped() {
    let html = concat!(
        "<style>@media (max-width: 600px) { p { color: blue } } div p { color: red } ",
        "a:hover { color: pink }</style><p>x</p><a>y</a>"
    );
    assert_eq!(StyleHoistingInliner.inline(html), "<p>x</p><a>y</a>");
}

#[test]
fn test_scripts_are_removed() {
    let html = "<p>a</p><script type=\"text/javascript\">alert('hi')</script><p>b</p>";
    assert_eq!(StyleHoistingInliner.inline(html), "<p>a</p><p>b</p>");
}

#[test]
fn test_self_closing_tags_keep_their_slash() {
    let html = "<style>img { border: 0 }</style><img src=\"logo.png\" />";
    assert_eq!(
        StyleHoistingInliner.inline(html),
        "<img src=\"logo.png\" style=\"border: 0\" />"
    );
}

#[test]
fn test_double_quotes_in_declarations_are_made_safe() {
    let html = "<style>p { font-family: \"Open Sans\", Arial }</style><p>x</p>";
    assert_eq!(
        StyleHoistingInliner.inline(html),
        "<p style=\"font-family: 'Open Sans', Arial\">x</p>"
    );
}

#[test]
fn test_comments_are_ignored() {
    let html = "<style>/* .hidden { display: none } */ b { font-weight: bold }</style><b class=\"hidden\">x</b>";
    assert_eq!(
        StyleHoistingInliner.inline(html),
        "<b class=\"hidden\" style=\"font-weight: bold\">x</b>"
    );
}

#[test]
fn test_no_styles_leaves_markup() {
    let html = "<!DOCTYPE html><table><tr><td>{{first_name}}</td></tr></table>";
    assert_eq!(StyleHoistingInliner.inline(html), html);
}
