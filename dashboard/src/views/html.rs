//! Minimal HTML node tree
//!
//! Diffing and patching belong to the consuming layer; this tree only knows
//! how to render itself to a string, escaping text and attribute values.

/// An HTML node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Html {
    Element(Element),
    Text(String),
    /// Renders nothing; the absent branch of a conditional
    Empty,
}

impl Html {
    pub fn text(content: impl Into<String>) -> Html {
        Html::Text(content.into())
    }

    /// Render the node to an HTML string
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Html::Element(element) => element.render_into(out),
            Html::Text(text) => out.push_str(&escape(text)),
            Html::Empty => {}
        }
    }
}

/// An element node with attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(String, String)>,
    children: Vec<Html>,
}

/// Start building an element
pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

impl Element {
    /// Append to the class attribute
    pub fn class(mut self, class: &str) -> Self {
        if class.is_empty() {
            return self;
        }
        match self.attrs.iter_mut().find(|(name, _)| name == "class") {
            Some((_, value)) => {
                value.push(' ');
                value.push_str(class);
            }
            None => self.attrs.push(("class".to_string(), class.to_string())),
        }
        self
    }

    /// Set an attribute
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Append a child node
    pub fn child(mut self, child: impl Into<Html>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append children from an iterator
    pub fn children(mut self, nodes: impl IntoIterator<Item = Html>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Append a text child
    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(Html::Text(content.into()))
    }

    pub fn build(self) -> Html {
        Html::Element(self)
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            child.render_into(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

impl From<Element> for Html {
    fn from(element: Element) -> Html {
        Html::Element(element)
    }
}

/// Escape text for body and attribute positions
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
