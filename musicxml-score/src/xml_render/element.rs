/// Generic document element: name, ordered attributes, optional text and
/// children.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}
impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    /// Element holding only text.
    pub fn text_node(name: impl Into<String>, text: impl ToString) -> Self {
        Self::new(name).with_text(text)
    }

    pub fn with_attr(
        mut self,
        key: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        self.set_attr(key, value);
        self
    }
    pub fn with_text(mut self, text: impl ToString) -> Self {
        self.text = Some(text.to_string());
        self
    }
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }
    pub fn with_children(
        mut self,
        children: impl IntoIterator<Item = XmlElement>,
    ) -> Self {
        self.children.extend(children);
        self
    }

    /// Replace the value if attribute exists, else append it.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key, value)),
        }
    }
    pub fn push(&mut self, child: XmlElement) -> &mut Self {
        self.children.push(child);
        self
    }
    pub fn extend(&mut self, children: impl IntoIterator<Item = XmlElement>) {
        self.children.extend(children);
    }
    pub fn push_text_node(
        &mut self,
        name: impl Into<String>,
        text: impl ToString,
    ) -> &mut Self {
        self.push(Self::text_node(name, text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }
    /// First direct child with the name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }
    /// Direct children with the name.
    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }
    /// Every descendant with the name, depth first.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        for child in self.children.iter() {
            if child.name == name {
                found.push(child);
            }
            found.extend(child.descendants_named(name));
        }
        found
    }
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_query() {
        let mut note = XmlElement::new("note");
        note.push(XmlElement::new("rest"))
            .push_text_node("duration", 4);
        note.set_attr("print-object", "no");
        note.set_attr("print-object", "yes");
        let el = XmlElement::new("measure")
            .with_attr("number", 1)
            .with_child(note);
        assert_eq!(el.attr("number"), Some("1"));
        let note = el.child("note").unwrap();
        assert_eq!(note.attributes().len(), 1);
        assert_eq!(note.attr("print-object"), Some("yes"));
        assert_eq!(note.child_names(), vec!["rest", "duration"]);
        assert_eq!(el.descendants_named("duration")[0].text(), Some("4"));
    }
}
