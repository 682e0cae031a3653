//! Vocabulary terms used by cube projects.
//!
//! Constants keep the exact local names of the vocabularies they come from,
//! so `cc::ColumnMapping` is the class and `cc::columnMapping` the property.

#![allow(non_upper_case_globals)]

macro_rules! vocabulary {
    ($(#[$meta:meta])* $module:ident = $ns:literal { $($name:ident = $local:literal),* $(,)? }) => {
        $(#[$meta])*
        pub mod $module {
            use crate::graph::Iri;

            /// Namespace IRI.
            pub const NS: &str = $ns;

            $(pub const $name: Iri = Iri::from_static(concat!($ns, $local));)*
        }
    };
}

vocabulary! {
    /// Cube creator vocabulary.
    cc = "https://cube-creator.zazuko.com/vocab#" {
        CubeProject = "CubeProject",
        ProjectsCollection = "ProjectsCollection",
        CsvMapping = "CsvMapping",
        CSVSource = "CSVSource",
        CSVSourceCollection = "CSVSourceCollection",
        Table = "Table",
        TableCollection = "TableCollection",
        ObservationTable = "ObservationTable",
        ColumnMapping = "ColumnMapping",
        LiteralColumnMapping = "LiteralColumnMapping",
        ReferenceColumnMapping = "ReferenceColumnMapping",
        IdentifierMapping = "IdentifierMapping",
        DimensionMetadataCollection = "DimensionMetadataCollection",
        Dataset = "Dataset",
        JobCollection = "JobCollection",
        Job = "Job",
        TransformJob = "TransformJob",
        projectSourceKind = "projectSourceKind",
        projects = "projects",
        csvMapping = "csvMapping",
        csvSource = "csvSource",
        csvSourceCollection = "csvSourceCollection",
        tables = "tables",
        columnMapping = "columnMapping",
        sourceColumn = "sourceColumn",
        targetProperty = "targetProperty",
        datatype = "datatype",
        language = "language",
        defaultValue = "defaultValue",
        referencedTable = "referencedTable",
        identifierMapping = "identifierMapping",
        referencedColumn = "referencedColumn",
        dimensionMetadata = "dimensionMetadata",
        dimensionMapping = "dimensionMapping",
        dataset = "dataset",
        project = "project",
        sharedDimension = "sharedDimension",
        onlyValidTerms = "onlyValidTerms",
        applyMappings = "applyMappings",
        cubeGraph = "cubeGraph",
        jobCollection = "jobCollection",
    }
}

vocabulary! {
    /// Shapes referenced by project creation.
    shape = "https://cube-creator.zazuko.com/shape/" {
        project_create_csv = "cube-project/create#CSV",
        project_create_existing_cube = "cube-project/create#ExistingCube",
    }
}

vocabulary! {
    cube = "https://cube.link/" {
        Cube = "Cube",
        Observation = "Observation",
        observation = "observation",
    }
}

vocabulary! {
    rdf = "http://www.w3.org/1999/02/22-rdf-syntax-ns#" {
        type_ = "type",
        langString = "langString",
    }
}

vocabulary! {
    rdfs = "http://www.w3.org/2000/01/rdf-schema#" {
        label = "label",
        seeAlso = "seeAlso",
    }
}

vocabulary! {
    xsd = "http://www.w3.org/2001/XMLSchema#" {
        string = "string",
        boolean = "boolean",
        integer = "integer",
        dateTime = "dateTime",
    }
}

vocabulary! {
    hydra = "http://www.w3.org/ns/hydra/core#" {
        Collection = "Collection",
        Resource = "Resource",
        title = "title",
        manages = "manages",
        member = "member",
        property = "property",
        object = "object",
        subject = "subject",
    }
}

vocabulary! {
    schema = "http://schema.org/" {
        Dataset = "Dataset",
        ContactPoint = "ContactPoint",
        Thing = "Thing",
        PotentialActionStatus = "PotentialActionStatus",
        ActiveActionStatus = "ActiveActionStatus",
        CompletedActionStatus = "CompletedActionStatus",
        FailedActionStatus = "FailedActionStatus",
        hasPart = "hasPart",
        about = "about",
        name = "name",
        email = "email",
        description = "description",
        contactPoint = "contactPoint",
        actionStatus = "actionStatus",
        error = "error",
    }
}

vocabulary! {
    dcterms = "http://purl.org/dc/terms/" {
        creator = "creator",
        created = "created",
    }
}

vocabulary! {
    dcat = "http://www.w3.org/ns/dcat#" {
        Dataset = "Dataset",
        contactPoint = "contactPoint",
    }
}

vocabulary! {
    vcard = "http://www.w3.org/2006/vcard/ns#" {
        fn_ = "fn",
        hasEmail = "hasEmail",
    }
}

vocabulary! {
    void = "http://rdfs.org/ns/void#" {
        Dataset = "Dataset",
    }
}

vocabulary! {
    prov = "http://www.w3.org/ns/prov#" {
        Dictionary = "Dictionary",
        KeyEntityPair = "KeyEntityPair",
        hadDictionaryMember = "hadDictionaryMember",
        pairKey = "pairKey",
        pairEntity = "pairEntity",
    }
}

vocabulary! {
    csvw = "http://www.w3.org/ns/csvw#" {
        column = "column",
    }
}
