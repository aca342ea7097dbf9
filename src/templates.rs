//! Sample HTML fragments for testing and demonstration.
//!
//! Each template exercises a different part of paragraph composition.

/// Report with headings, styled inline spans, and both list kinds.
pub fn report_template() -> &'static str {
    r##"
<html>
<head><title>Quarterly Report</title></head>
<body>
    <h1>Quarterly Report</h1>
    <p style="color: rgb(107, 114, 128)">Q4 2025 <span style="font-weight: bold">Confidential</span></p>

    <h2>Executive Summary</h2>
    <p>
        Revenue grew by <b style="color: rgb(34, 197, 94)">23%</b> year-over-year,
        reaching <strong>$4.2M</strong> for the quarter, with
        <em>notable wins in the enterprise segment</em>.
    </p>

    <h2>Key Highlights</h2>
    <ul>
        <li>Customer acquisition cost reduced by 15%</li>
        <li>Net promoter score improved to 72</li>
        <li>Three new enterprise partnerships signed</li>
    </ul>

    <h2>Action Items</h2>
    <ol>
        <li>Expand sales team by Q1 2026</li>
        <li>Launch mobile application beta</li>
        <li>Complete SOC2 Type II certification</li>
    </ol>

    <p style="font-size: x-small">
        This document is confidential.<br/>Do not distribute without authorization.
    </p>
</body>
</html>
"##
}

/// Every inline declaration the style resolver understands.
pub fn inline_styles_template() -> &'static str {
    r##"
<div style="font-family: Georgia">
    <p>
        <span style="font-weight: bold">bold</span>
        <span style="font-style: italic">italic</span>
        <span style="color: rgb(255, 0, 16)">red</span>
        <span style="background-color: rgb(255,255,0)">highlight</span>
        <span style="text-decoration-line: underline">underline</span>
        <span style="text-decoration-line: line-through">struck</span>
        <span style="font-size: 20">twenty</span>
        <span style="font-size: xx-large">huge</span>
    </p>
</div>
"##
}

/// Nested lists, an item holding a paragraph, and a loose list child.
pub fn nested_lists_template() -> &'static str {
    r##"
<ol>
    <li>First step</li>
    <li>Second step
        <ul>
            <li>Detail <i>one</i></li>
            <li>Detail two</li>
        </ul>
    </li>
    <li><p>Third step in a paragraph</p></li>
</ol>
"##
}
